#![forbid(unsafe_code)]

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use survey_storage::StoreOptions;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "survey_mcp")]
#[command(about = "Survey store served as MCP tools over stdio", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Directory holding survey.db (created when missing)
    #[arg(long, env = "SURVEY_STORAGE_DIR", default_value = ".survey")]
    pub(crate) storage_dir: PathBuf,

    /// Log filter directive, e.g. `info` or `survey_core=debug`
    #[arg(long, env = "SURVEY_LOG", default_value = "info")]
    pub(crate) log: String,

    /// How long a write waits for another writer before failing
    #[arg(long, env = "SURVEY_BUSY_TIMEOUT_MS", default_value = "5000")]
    pub(crate) busy_timeout_ms: u64,
}

impl Cli {
    pub(crate) fn store_options(&self) -> StoreOptions {
        StoreOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }
}

/// Logs go to stderr; stdout carries the protocol.
pub(crate) fn init_logging(filter: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_new(filter)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .map_err(|err| -> Box<dyn std::error::Error> { err })?;
    Ok(())
}
