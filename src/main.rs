//! Runcached - cached execution of expensive shell commands
//!
//! CLI entry point.

use clap::Parser;
use console::style;
use runcached::cli::{self, Cli};
use runcached::config::ConfigManager;
use runcached::error::RuncachedResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> RuncachedResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug. Logs go to
    // stderr; stdout carries only the payload.
    let filter = match cli.verbose {
        0 => EnvFilter::new("runcached=warn"),
        1 => EnvFilter::new("runcached=info"),
        _ => EnvFilter::new("runcached=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    cli::execute(cli, &config).await
}
