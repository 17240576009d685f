//! Command-line configuration.

use clap::Parser;
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "contactbook.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Parser)]
#[command(name = "contactbook")]
#[command(about = "Personal contact book with phones and upcoming birthdays")]
#[command(version)]
pub struct Args {
    /// Contact book file; created when missing
    #[arg(long, env = "CONTACTBOOK_DB", default_value = DEFAULT_DB_FILE_NAME)]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "CONTACTBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files [default: ./logs]
    #[arg(long, env = "CONTACTBOOK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Disable file logging
    #[arg(long)]
    pub no_log: bool,
}

impl Args {
    /// Absolute log directory; relative values resolve against the
    /// working directory.
    pub fn resolved_log_dir(&self) -> std::io::Result<PathBuf> {
        let dir = self
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR_NAME));
        if dir.is_absolute() {
            return Ok(dir);
        }
        Ok(std::env::current_dir()?.join(dir))
    }
}
