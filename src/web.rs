#![cfg(not(tarpaulin_include))]

use clap::Parser;
use sheetfix::app;
use sheetfix::config::ServerConfig;

/// Main entry point for the review web server
///
/// Serves the review page and the JSON API over a single in-memory
/// document. Settings come from flags or `SHEETFIX_HOST`/`SHEETFIX_PORT`;
/// log verbosity from `RUST_LOG`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();
    app::run(&config).await
}
