use crate::config::AllConfig;
use crate::error::SyncResult;
use crate::pipeline::mysql_backup::{self, run_mysql_backup};
use crate::pipeline::pg_sync::run_pg_sync;
use crate::pipeline::PipelineStatus;
use crate::process::CommandRunner;
use tracing::info;

/// Process status for configuration, parse and other errors that stop a run
/// before it produces a [`PipelineStatus`].
pub const EXIT_ERROR: u8 = 2;

/// Maps the outcome of a subcommand to the process exit status. `None` is a
/// subcommand without a pipeline, such as `version`.
pub fn exit_code<E>(outcome: &Result<Option<PipelineStatus>, E>) -> u8 {
    match outcome {
        Ok(Some(status)) => status.exit_code(),
        Ok(None) => 0,
        Err(_) => EXIT_ERROR,
    }
}

pub async fn mysql_backup(
    config: &AllConfig,
    runner: &dyn CommandRunner,
) -> SyncResult<PipelineStatus> {
    // validate before building the storage client so missing keys fail fast
    mysql_backup::validate(&config.mysql, &config.storage)?;
    let storage = config.storage.storage()?;

    info!("Starting MySQL backup for database: {}", config.mysql.database);
    run_mysql_backup(
        &config.app,
        &config.mysql,
        &config.storage,
        storage.as_ref(),
        runner,
    )
    .await
}

pub async fn pg_sync(
    config: &AllConfig,
    runner: &dyn CommandRunner,
) -> SyncResult<PipelineStatus> {
    info!("Starting PostgreSQL sync");
    run_pg_sync(&config.app, &config.pgsync, runner).await
}
