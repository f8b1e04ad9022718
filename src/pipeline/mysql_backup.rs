use super::{PipelineStatus, Stage};
use crate::config::{AppConfig, MySqlConfig, StorageConfig};
use crate::database::mysql::MySql;
use crate::database::Database;
use crate::error::{SyncError, SyncResult};
use crate::process::CommandRunner;
use crate::storage::Storage;
use crate::utils::{remove_if_exists, run_stamp, stamped_path};
use chrono::Local;
use std::path::Path;
use tracing::{error, info};

/// Checks every setting the backup needs before anything touches disk.
pub fn validate(mysql: &MySqlConfig, storage: &StorageConfig) -> SyncResult<()> {
    mysql.validate()?;
    storage.validate()
}

/// Dumps the MySQL database, uploads the dump and removes the local copy.
pub async fn run_mysql_backup(
    app: &AppConfig,
    mysql: &MySqlConfig,
    storage_config: &StorageConfig,
    storage: &dyn Storage,
    runner: &dyn CommandRunner,
) -> SyncResult<PipelineStatus> {
    validate(mysql, storage_config)?;

    let dump_file = stamped_path(
        &app.get_temp_dir(),
        &mysql.dump_prefix,
        &run_stamp(Local::now()),
        "sql",
    );

    let outcome = dump_and_upload(mysql, &dump_file, storage, &storage_config.folder, runner).await;
    let cleanup = remove_if_exists(&dump_file).await;

    let status = outcome?;
    cleanup?;
    Ok(status)
}

async fn dump_and_upload(
    mysql: &MySqlConfig,
    dump_file: &Path,
    storage: &dyn Storage,
    folder: &str,
    runner: &dyn CommandRunner,
) -> SyncResult<PipelineStatus> {
    let db = MySql::new(mysql);
    match db.dump(runner, dump_file).await {
        Ok(_) => {}
        Err(SyncError::Execution(e)) => {
            error!("error generating dump from source database: {}", e);
            return Ok(PipelineStatus::Failed(Stage::Dump));
        }
        Err(e) => return Err(e),
    }

    match storage.upload(dump_file, folder).await {
        Ok(key) => {
            info!("uploaded dump with key {}", key);
            Ok(PipelineStatus::Completed)
        }
        Err(e) => {
            error!("error uploading dump: {}", e);
            Ok(PipelineStatus::Failed(Stage::Upload))
        }
    }
}
