use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn resolve_path(path_str: &str) -> Result<PathBuf, String> {
    let resolved_path = if path_str.starts_with("~") {
        let expanded_str = shellexpand::tilde(path_str);
        PathBuf::from(expanded_str.to_string())
    } else {
        PathBuf::from(path_str)
    };

    if resolved_path.exists() {
        fs::canonicalize(&resolved_path).map_err(|e| format!("Could not canonicalize path: {}", e))
    } else {
        Ok(resolved_path)
    }
}

/// Minute-resolution stamp used in dump, log and credential file names.
pub fn run_stamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d-%H%M").to_string()
}

/// `<dir>/<prefix>-<stamp>.<ext>`
pub fn stamped_path(dir: &Path, prefix: &str, stamp: &str, ext: &str) -> PathBuf {
    dir.join(format!("{}-{}.{}", prefix, stamp, ext))
}

pub async fn remove_if_exists(path: &Path) -> SyncResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!("removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SyncError::io("remove file", path, e)),
    }
}
