use super::{PipelineStatus, Stage};
use crate::config::{AppConfig, PgSyncConfig};
use crate::database::postgresql::PostgreSql;
use crate::database::{ConnectionDescriptor, Database};
use crate::error::{ExecutionError, SyncError, SyncResult};
use crate::pgpass::CredentialFile;
use crate::process::{CommandRunner, ProcessResult};
use crate::utils::{remove_if_exists, run_stamp, stamped_path};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

const SECTION_RULE: &str = "********************";

/// Parses both connection strings and refuses unedited template values.
pub fn parse_targets(
    pgsync: &PgSyncConfig,
) -> SyncResult<(ConnectionDescriptor, ConnectionDescriptor)> {
    let source: ConnectionDescriptor = pgsync.source.parse()?;
    let target: ConnectionDescriptor = pgsync.target.parse()?;

    if source.is_placeholder() || target.is_placeholder() {
        return Err(SyncError::Config(
            "set SOURCE/TARGET database information correctly".into(),
        ));
    }
    Ok((source, target))
}

/// Copies the source database into the target with `pg_dump`/`pg_restore`.
pub async fn run_pg_sync(
    app: &AppConfig,
    pgsync: &PgSyncConfig,
    runner: &dyn CommandRunner,
) -> SyncResult<PipelineStatus> {
    let (source, target) = parse_targets(pgsync)?;

    let stamp = run_stamp(Local::now());
    let dump_file = stamped_path(&app.get_temp_dir(), &pgsync.dump_prefix, &stamp, "dump");
    let credentials = app.credential_file()?;

    let outcome = dump_and_restore(
        source,
        target,
        &credentials,
        &dump_file,
        &app.get_log_dir(),
        runner,
    )
    .await;

    let cleanup_credentials = credentials.remove().await;
    let cleanup_dump = remove_if_exists(&dump_file).await;

    let status = outcome?;
    cleanup_credentials?;
    cleanup_dump?;
    Ok(status)
}

async fn dump_and_restore(
    source: ConnectionDescriptor,
    target: ConnectionDescriptor,
    credentials: &CredentialFile,
    dump_file: &Path,
    log_dir: &Path,
    runner: &dyn CommandRunner,
) -> SyncResult<PipelineStatus> {
    let source_db = PostgreSql::new(source, credentials);
    match source_db.dump(runner, dump_file).await {
        Ok(_) => {}
        Err(SyncError::Execution(e)) => {
            error!("error downloading dump from source database: {}", e);
            return Ok(PipelineStatus::Failed(Stage::Dump));
        }
        Err(e) => return Err(e),
    }

    // A managed target typically rejects ownership changes on extensions
    // ("must be owner of extension plpgsql"), so a non-zero restore is logged
    // as a warning rather than failing the run.
    let target_db = PostgreSql::new(target, credentials);
    let (result, status) = match target_db.restore(runner, dump_file).await {
        Ok(result) => (result, PipelineStatus::Completed),
        Err(SyncError::Execution(ExecutionError::Failed { result, .. })) => {
            warn!(
                "pg_restore exited with {:?}, see the restore log for details",
                result.exit_code
            );
            (result, PipelineStatus::CompletedWithWarnings)
        }
        Err(SyncError::Execution(e)) => {
            error!("error restoring dump into target database: {}", e);
            (ProcessResult::default(), PipelineStatus::Failed(Stage::Restore))
        }
        Err(e) => return Err(e),
    };

    let log_file = write_restore_log(log_dir, &result).await?;
    info!("generated upload log @ {}", log_file.display());

    Ok(status)
}

/// Writes `pgsync-<stamp>.log` into `log_dir` (which must already exist) with
/// the restore's stdout section followed by its stderr section.
pub async fn write_restore_log(log_dir: &Path, result: &ProcessResult) -> SyncResult<PathBuf> {
    let log_file = stamped_path(log_dir, "pgsync", &run_stamp(Local::now()), "log");

    let content = format!(
        "{rule}Output{rule}\n{}\n{rule}Error{rule}\n{}\n",
        result.stdout.as_deref().unwrap_or_default(),
        result.stderr.as_deref().unwrap_or_default(),
        rule = SECTION_RULE,
    );

    tokio::fs::write(&log_file, content)
        .await
        .map_err(|e| SyncError::io("write restore log", &log_file, e))?;
    Ok(log_file)
}
