//! Password file consumed by `pg_dump`/`pg_restore` through `PGPASSFILE`.

use crate::error::{SyncError, SyncResult};
use crate::utils::remove_if_exists;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, warn};

/// Writes `*:*:*:*:<password>` to `path`, replacing any previous content.
///
/// The file is created with mode 0600 and the mode is re-applied on the open
/// handle, so an existing file with wider permissions is tightened before the
/// password is written. Only used for an explicitly configured location.
pub async fn write_password(path: &Path, password: &str) -> SyncResult<()> {
    debug!("<write_password> creating password file at {}", path.display());

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .await
        .map_err(|e| SyncError::io("open password file", path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(|e| SyncError::io("restrict password file", path, e))?;
    }

    write_line(&mut file, path, password).await
}

async fn write_line(file: &mut tokio::fs::File, path: &Path, password: &str) -> SyncResult<()> {
    file.write_all(format!("*:*:*:*:{}\n", password).as_bytes())
        .await
        .map_err(|e| SyncError::io("write password file", path, e))?;
    file.flush()
        .await
        .map_err(|e| SyncError::io("write password file", path, e))
}

/// Credential file for one run.
///
/// A scoped file is created exclusively (`O_EXCL`, mode 0600, random name) and
/// rewritten through the handle it was created with, so the path is never
/// reopened. A fixed file is the opt-in legacy location such as `~/.pgpass`.
/// Either kind is removed by [`CredentialFile::remove`] or when dropped.
#[derive(Debug)]
pub struct CredentialFile {
    path: PathBuf,
    scoped: Option<NamedTempFile>,
}

impl CredentialFile {
    /// Creates a fresh `pgsync-*.pgpass` file inside `dir`.
    pub fn scoped(dir: &Path) -> SyncResult<Self> {
        let file = tempfile::Builder::new()
            .prefix("pgsync-")
            .suffix(".pgpass")
            .tempfile_in(dir)
            .map_err(|e| SyncError::io("create password file", dir, e))?;
        debug!("created password file at {}", file.path().display());

        Ok(CredentialFile {
            path: file.path().to_path_buf(),
            scoped: Some(file),
        })
    }

    pub fn fixed(path: impl Into<PathBuf>) -> Self {
        CredentialFile {
            path: path.into(),
            scoped: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, password: &str) -> SyncResult<()> {
        match &self.scoped {
            Some(tmp) => {
                let handle = tmp
                    .as_file()
                    .try_clone()
                    .map_err(|e| SyncError::io("open password file", &self.path, e))?;
                let mut file = tokio::fs::File::from_std(handle);
                file.set_len(0)
                    .await
                    .map_err(|e| SyncError::io("truncate password file", &self.path, e))?;
                file.seek(SeekFrom::Start(0))
                    .await
                    .map_err(|e| SyncError::io("truncate password file", &self.path, e))?;
                write_line(&mut file, &self.path, password).await
            }
            None => write_password(&self.path, password).await,
        }
    }

    /// Deletes the file if present; a missing file is not an error.
    pub async fn remove(&self) -> SyncResult<()> {
        remove_if_exists(&self.path).await
    }
}

impl Drop for CredentialFile {
    fn drop(&mut self) {
        // scoped files are deleted by NamedTempFile's own drop
        if self.scoped.is_some() {
            return;
        }
        // Drop cannot await; this is a single unlink
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("removed credential file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "failed to remove credential file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
