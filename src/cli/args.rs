//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Runcached - run expensive commands through a host-wide result cache
///
/// At most one real execution is in flight per cache file; concurrent
/// callers queue on the cache lock and adopt the fresh result instead
/// of re-running the command.
#[derive(Parser, Debug)]
#[command(name = "runcached")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shell command to execute (joined and passed to `sh -c`)
    #[arg(required = true, trailing_var_arg = true)]
    pub cmd: Vec<String>,

    /// Cache file path (derived from the command text if omitted)
    #[arg(short = 'f', long)]
    pub cache_file: Option<PathBuf>,

    /// Maximum cache age in seconds; 0 disables time-based reuse
    #[arg(short = 'a', long)]
    pub max_age: Option<u64>,

    /// Pattern the output must match to be cached
    #[arg(short = 'm', long = "match")]
    pub pattern: Option<String>,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "RUNCACHED_CONFIG")]
    pub config: Option<PathBuf>,
}
