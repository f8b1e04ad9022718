use anyhow::Result;
use clap::Parser;
use dbsynctool::cli::{command, Cli, Commands};
use dbsynctool::config::{get_all_config, AllConfig};
use dbsynctool::logging;
use dbsynctool::pipeline::PipelineStatus;
use dbsynctool::process::SystemRunner;
use std::process::ExitCode;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level);
    debug!("start");

    let outcome = run(cli).await;
    match &outcome {
        Ok(Some(status)) => info!("pipeline {}", status),
        Ok(None) => {}
        Err(e) => error!("Error: {:#}", e),
    }

    debug!("finish");
    ExitCode::from(command::exit_code(&outcome))
}

async fn run(cli: Cli) -> Result<Option<PipelineStatus>> {
    let runner = SystemRunner;
    let status = match cli.command {
        Commands::MysqlBackup => {
            let config = load_config(&cli.config)?;
            command::mysql_backup(&config, &runner).await?
        }
        Commands::PgSync => {
            let config = load_config(&cli.config)?;
            command::pg_sync(&config, &runner).await?
        }
        Commands::Version => {
            println!("dbsynctool v{}", env!("CARGO_PKG_VERSION"));
            return Ok(None);
        }
    };
    Ok(Some(status))
}

fn load_config(path: &str) -> Result<AllConfig> {
    match get_all_config(path) {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("Failed to load config {}: {}", path, e),
    }
}
