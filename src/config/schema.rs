//! Configuration schema for runcached
//!
//! Configuration is stored at `~/.config/runcached/config.toml` and
//! only supplies defaults; command-line flags always win.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for derived cache files; platform state dir if unset
    pub cache_dir: Option<PathBuf>,

    /// Default staleness window in seconds; 0 disables time-based reuse
    pub default_max_age_secs: u64,

    /// Default validator pattern; `.` accepts any non-empty output
    pub default_pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: None,
            default_max_age_secs: 0,
            default_pattern: ".".to_string(),
        }
    }
}
