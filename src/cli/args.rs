use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dbsynctool")]
#[command(
    about = "MySQL backup to object storage and PostgreSQL dump/restore sync",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Specific file for configuration
    #[arg(short, long, default_value = "dbsynctool.toml")]
    pub config: String,
    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dump the MySQL database and upload it to object storage
    MysqlBackup,

    /// Dump the source PostgreSQL database and restore it into the target
    PgSync,

    /// Show tool version
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["dbsynctool", "pg-sync"]).unwrap();
        assert!(matches!(cli.command, Commands::PgSync));
        assert_eq!(cli.config, "dbsynctool.toml");
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_parse_config_and_level() {
        let cli = Cli::try_parse_from([
            "dbsynctool",
            "-c",
            "/etc/dbsynctool.toml",
            "--log-level",
            "debug",
            "mysql-backup",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::MysqlBackup));
        assert_eq!(cli.config, "/etc/dbsynctool.toml");
        assert_eq!(cli.log_level, "debug");
    }
}
