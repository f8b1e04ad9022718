pub mod connection;
pub mod mysql;
pub mod postgresql;

use crate::error::SyncResult;
use crate::process::{CommandRunner, ProcessResult};
use std::path::Path;

pub use connection::ConnectionDescriptor;

#[async_trait::async_trait]
pub trait Database: Send + Sync {
    /// Writes a dump of the configured database to `dump_file`.
    async fn dump(&self, runner: &dyn CommandRunner, dump_file: &Path) -> SyncResult<ProcessResult>;
}
