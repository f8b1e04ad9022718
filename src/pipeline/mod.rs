//! Single-shot pipelines: run each stage in order, clean up, report a status.

pub mod mysql_backup;
pub mod pg_sync;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Dump,
    Upload,
    Restore,
}

/// Terminal outcome of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Completed,
    /// The restore tool exited non-zero but the run is still considered usable;
    /// details are in the restore log.
    CompletedWithWarnings,
    Failed(Stage),
}

impl PipelineStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            PipelineStatus::Completed | PipelineStatus::CompletedWithWarnings => 0,
            PipelineStatus::Failed(_) => 1,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Dump => "dump",
            Stage::Upload => "upload",
            Stage::Restore => "restore",
        };
        f.write_str(name)
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::Completed => f.write_str("completed"),
            PipelineStatus::CompletedWithWarnings => f.write_str("completed with warnings"),
            PipelineStatus::Failed(stage) => write!(f, "failed at {} stage", stage),
        }
    }
}
