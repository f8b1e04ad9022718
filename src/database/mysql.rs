use super::Database;
use crate::config::MySqlConfig;
use crate::error::{SyncError, SyncResult};
use crate::process::{CommandRunner, Invocation, ProcessResult};
use std::ops::Deref;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct MySql(MySqlConfig);

impl Deref for MySql {
    type Target = MySqlConfig;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait::async_trait]
impl Database for MySql {
    async fn dump(
        &self,
        runner: &dyn CommandRunner,
        dump_file: &Path,
    ) -> SyncResult<ProcessResult> {
        info!("<dump_db> generating the {} database dump", self.database);

        // mysqldump writes the dump on stdout; stream it straight into the file
        let file = tokio::fs::File::create(dump_file)
            .await
            .map_err(|e| SyncError::io("create dump file", dump_file, e))?
            .into_std()
            .await;

        let result = runner
            .run(Invocation::new(self.dump_args()).stdout_to(file))
            .await?;

        debug!("<dump_db> {:?}", result);
        Ok(result)
    }
}

impl MySql {
    pub fn new(config: &MySqlConfig) -> Self {
        MySql(config.clone())
    }

    pub fn dump_args(&self) -> Vec<String> {
        vec![
            "mysqldump".into(),
            "-u".into(),
            self.user.clone(),
            format!("-p{}", self.password),
            "--databases".into(),
            self.database.clone(),
        ]
    }
}
