use super::{ConnectionDescriptor, Database};
use crate::error::SyncResult;
use crate::pgpass::CredentialFile;
use crate::process::{CommandRunner, Invocation, ProcessResult};
use std::ops::Deref;
use std::path::Path;
use tracing::{debug, info};

/// One side of a sync: a parsed connection plus the run's password file.
#[derive(Debug)]
pub struct PostgreSql<'a> {
    conn: ConnectionDescriptor,
    credentials: &'a CredentialFile,
}

impl Deref for PostgreSql<'_> {
    type Target = ConnectionDescriptor;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

#[async_trait::async_trait]
impl Database for PostgreSql<'_> {
    async fn dump(
        &self,
        runner: &dyn CommandRunner,
        dump_file: &Path,
    ) -> SyncResult<ProcessResult> {
        self.credentials.write(&self.password).await?;

        info!("downloading database dump from source: {}", self.conn);

        let result = runner.run(self.invocation(self.dump_args(dump_file))).await?;

        debug!("{:?}", result);
        Ok(result)
    }
}

impl<'a> PostgreSql<'a> {
    pub fn new(conn: ConnectionDescriptor, credentials: &'a CredentialFile) -> Self {
        PostgreSql { conn, credentials }
    }

    /// Replays `dump_file` into this database with `pg_restore`.
    pub async fn restore(
        &self,
        runner: &dyn CommandRunner,
        dump_file: &Path,
    ) -> SyncResult<ProcessResult> {
        self.credentials.write(&self.password).await?;

        info!("uploading database dump to target: {}", self.conn);

        let result = runner
            .run(self.invocation(self.restore_args(dump_file)))
            .await?;
        Ok(result)
    }

    pub fn dump_args(&self, dump_file: &Path) -> Vec<String> {
        vec![
            "pg_dump".into(),
            "--verbose".into(),
            "-F".into(),
            "c".into(),
            "-b".into(),
            "-h".into(),
            self.host.clone(),
            "-p".into(),
            self.port.clone(),
            "-U".into(),
            self.user.clone(),
            "-w".into(),
            "-f".into(),
            dump_file.display().to_string(),
            self.database.clone(),
        ]
    }

    pub fn restore_args(&self, dump_file: &Path) -> Vec<String> {
        vec![
            "pg_restore".into(),
            "--verbose".into(),
            "--clean".into(),
            "--no-acl".into(),
            "--no-owner".into(),
            "-h".into(),
            self.host.clone(),
            "-p".into(),
            self.port.clone(),
            "-U".into(),
            self.user.clone(),
            "-w".into(),
            "-d".into(),
            self.database.clone(),
            dump_file.display().to_string(),
        ]
    }

    fn invocation(&self, args: Vec<String>) -> Invocation {
        Invocation::new(args).env(
            "PGPASSFILE",
            self.credentials.path().display().to_string(),
        )
    }
}
