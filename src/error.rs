use crate::process::ProcessResult;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

/// Failure of a single external command invocation.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The executable could not be started (missing binary, permissions).
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The child started but waiting on it failed.
    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The child exited with a non-zero code or was killed by a signal.
    /// The captured output is kept so callers can still log or persist it.
    #[error(
        "{program} exited with {}: {}",
        display_code(.result.exit_code),
        .result.stderr.as_deref().unwrap_or("")
    )]
    Failed {
        program: String,
        result: ProcessResult,
    },
}

impl ExecutionError {
    /// Captured output, if the process got far enough to produce any.
    pub fn result(&self) -> Option<&ProcessResult> {
        match self {
            ExecutionError::Failed { result, .. } => Some(result),
            _ => None,
        }
    }
}

fn display_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "no exit code".to_string(),
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// Required setting empty or still holding its template placeholder.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("malformed connection string: {0}")]
    Parse(String),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("{operation} failed for {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SyncError {
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_message_includes_code_and_stderr() {
        let err = ExecutionError::Failed {
            program: "pg_dump".into(),
            result: ProcessResult {
                stdout: None,
                stderr: Some("connection refused".into()),
                exit_code: Some(1),
            },
        };
        assert_eq!(
            err.to_string(),
            "pg_dump exited with code 1: connection refused"
        );
        assert_eq!(err.result().and_then(|r| r.exit_code), Some(1));
    }

    #[test]
    fn test_signal_exit_has_no_code() {
        let err = ExecutionError::Failed {
            program: "mysqldump".into(),
            result: ProcessResult::default(),
        };
        assert_eq!(err.to_string(), "mysqldump exited with no exit code: ");
    }
}
