use super::{object_key, Storage};
use crate::error::{SyncError, SyncResult};
use crate::utils::resolve_path;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Stores objects as plain files below `base_path`, keyed like the S3 provider.
pub struct LocalStorage {
    pub base_path: PathBuf,
}

#[async_trait::async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, file_path: &Path, folder: &str) -> SyncResult<String> {
        let key = object_key(file_path, folder)?;
        let target_path = self.base_path.join(&key);

        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SyncError::io("create storage directory", parent, e))?;
        }

        fs::copy(file_path, &target_path)
            .await
            .map_err(|e| SyncError::Upload(format!("Failed to copy file: {}", e)))?;

        info!(
            "Successfully uploaded: {} to {}",
            file_path.display(),
            target_path.display()
        );
        Ok(key)
    }
}

impl LocalStorage {
    pub fn new(base_path: &str) -> Self {
        let base_path = resolve_path(base_path).unwrap_or_else(|_| PathBuf::from(base_path));
        LocalStorage { base_path }
    }
}
