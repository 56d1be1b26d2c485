//! CLI surface: argument parsing and the single run entry point

pub mod args;

pub use args::Cli;

use crate::cache::derived_cache_file;
use crate::config::{Config, ConfigManager};
use crate::engine::{self, InvocationOptions};
use crate::error::RuncachedResult;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

/// Resolve CLI arguments and config defaults into invocation options
pub async fn resolve_options(cli: &Cli, config: &Config) -> RuncachedResult<InvocationOptions> {
    let cmd = cli.cmd.join(" ");

    let cache_file = match &cli.cache_file {
        Some(path) => path.clone(),
        None => {
            let cache_dir = ConfigManager::ensure_cache_dir(config).await?;
            derived_cache_file(&cache_dir, &cmd)
        }
    };

    let max_age = cli.max_age.unwrap_or(config.default_max_age_secs);
    let pattern = cli
        .pattern
        .clone()
        .unwrap_or_else(|| config.default_pattern.clone());

    Ok(InvocationOptions {
        cmd,
        cache_file,
        cache_max_age: Duration::from_secs(max_age),
        pattern,
    })
}

/// Execute the invocation and print the payload verbatim to stdout
pub async fn execute(cli: Cli, config: &Config) -> RuncachedResult<()> {
    let options = resolve_options(&cli, config).await?;
    debug!(
        "Cache file {} (max age {}s)",
        options.cache_file.display(),
        options.cache_max_age.as_secs()
    );

    let payload = engine::run(&options).await?;

    // No trimming and no added newline; the payload is what the
    // command printed.
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(payload.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| crate::error::RuncachedError::io("writing payload to stdout", e))?;

    Ok(())
}
