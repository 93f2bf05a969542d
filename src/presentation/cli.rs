// Command-line arguments
use crate::infrastructure::config::ConfigOverrides;
use clap::Parser;
use std::path::PathBuf;

/// Render a PDF snapshot of recent security event activity
#[derive(Debug, Parser)]
#[command(name = "alert-report", version, about)]
pub struct Cli {
    /// Configuration file (defaults to config/report.* when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where to write the PDF; an existing file is replaced
    #[arg(long, value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    #[arg(long, value_name = "HOST")]
    pub db_host: Option<String>,

    #[arg(long, value_name = "PORT")]
    pub db_port: Option<u16>,

    #[arg(long, value_name = "USER")]
    pub db_user: Option<String>,

    #[arg(long, value_name = "PASSWORD")]
    pub db_password: Option<String>,

    /// Database holding the event and calendar tables
    #[arg(long, value_name = "NAME")]
    pub db_name: Option<String>,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        Self {
            config_file: cli.config,
            output_path: cli.output_path,
            db_host: cli.db_host,
            db_port: cli.db_port,
            db_user: cli.db_user,
            db_password: cli.db_password,
            db_name: cli.db_name,
        }
    }
}
