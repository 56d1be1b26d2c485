//! Configuration management for runcached

pub mod schema;

pub use schema::Config;

use crate::error::{RuncachedError, RuncachedResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("runcached")
            .join("config.toml")
    }

    /// Directory for derived cache files when the config does not name one
    pub fn default_cache_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("runcached")
    }

    /// Load configuration, falling back to defaults if not present
    pub async fn load(&self) -> RuncachedResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> RuncachedResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| RuncachedError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| RuncachedError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Resolve the cache directory and make sure it exists, owner-only
    pub async fn ensure_cache_dir(config: &Config) -> RuncachedResult<PathBuf> {
        let cache_dir = config
            .cache_dir
            .clone()
            .unwrap_or_else(Self::default_cache_dir);

        fs::create_dir_all(&cache_dir)
            .await
            .map_err(|e| RuncachedError::io("creating cache directory", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(&cache_dir, perms)
                .map_err(|e| RuncachedError::io("setting cache directory permissions", e))?;
        }

        Ok(cache_dir)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
