#![forbid(unsafe_code)]

mod config;
mod entry;
mod server;
mod support;
mod tools;

pub(crate) use server::McpServer;
pub(crate) use support::*;

use clap::Parser;
use survey_storage::SqliteStore;

// Some MCP clients are strict about the server echoing a compatible protocol version.
const MCP_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "survey-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = config::Cli::parse();
    config::init_logging(&cli.log)?;

    let store = SqliteStore::open_with(&cli.storage_dir, cli.store_options())?;
    tracing::info!(
        storage_dir = %store.storage_dir().display(),
        version = SERVER_VERSION,
        "survey server ready"
    );

    let mut server = McpServer::new(store);
    let result = entry::run_stdio(&mut server);
    if let Err(err) = &result {
        tracing::error!(error = %err, "stdio transport failed");
    }
    result
}
