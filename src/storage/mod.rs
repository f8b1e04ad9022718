use crate::error::{SyncError, SyncResult};
use std::path::Path;

pub mod local_storage;
pub mod s3_compatible;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Uploads `file_path` under `folder` and returns the object key used.
    async fn upload(&self, file_path: &Path, folder: &str) -> SyncResult<String>;
}

/// `<folder>/<basename>`, taken from the file's last path component.
pub fn object_key(file_path: &Path, folder: &str) -> SyncResult<String> {
    let file_name = file_path
        .file_name()
        .ok_or_else(|| SyncError::Upload(format!("Invalid file path: {}", file_path.display())))?
        .to_string_lossy();

    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        Ok(file_name.to_string())
    } else {
        Ok(format!("{}/{}", folder, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_uses_basename() {
        let dump = Path::new("/tmp/vtiger60-backup-20240101-0300.sql");
        let key = object_key(dump, "backups").unwrap();
        assert_eq!(key, "backups/vtiger60-backup-20240101-0300.sql");

        let key = object_key(Path::new("/var/tmp/nested/dir/a.sql"), "db/daily/").unwrap();
        assert_eq!(key, "db/daily/a.sql");
    }

    #[test]
    fn test_object_key_empty_folder() {
        let key = object_key(Path::new("/tmp/a.sql"), "").unwrap();
        assert_eq!(key, "a.sql");
    }

    #[test]
    fn test_object_key_rejects_directory_like_path() {
        assert!(object_key(Path::new("/"), "backups").is_err());
    }
}
