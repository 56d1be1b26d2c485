//! Error types for runcached
//!
//! All modules use `RuncachedResult<T>` as their return type. None of
//! these errors are retried internally; every failure path leaves the
//! cache file untouched.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for runcached operations
pub type RuncachedResult<T> = Result<T, RuncachedError>;

/// All errors that can occur in runcached
#[derive(Error, Debug)]
pub enum RuncachedError {
    // Lock errors: OS-level failure to open or lock the sidecar.
    // Contention is normal blocking, never an error.
    #[error("Failed to acquire lock on {path}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Cache store errors
    #[error("Cache IO error: {context}")]
    CacheIo {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Command errors
    #[error("Failed to spawn command: {command}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Validation errors
    #[error("Output of {command} did not match /{pattern}/: {payload:?}")]
    Validation {
        command: String,
        pattern: String,
        payload: String,
    },

    #[error("Invalid validator pattern /{pattern}/: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // General IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl RuncachedError {
    /// Create a lock acquisition error
    pub fn lock(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Lock {
            path: path.into(),
            source,
        }
    }

    /// Create a cache IO error with context
    pub fn cache_io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::CacheIo {
            context: context.into(),
            source,
        }
    }

    /// Create a command spawn error
    pub fn command_spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandSpawn {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error; empty stderr gets an explicit
    /// placeholder so the message never trails off silently.
    pub fn command_exec(command: impl Into<String>, stderr: &str) -> Self {
        let stderr = if stderr.is_empty() {
            "(no stderr)".to_string()
        } else {
            stderr.to_string()
        };
        Self::CommandExecution {
            command: command.into(),
            stderr,
        }
    }

    /// Create a validation error carrying the rejected payload
    pub fn validation(
        command: impl Into<String>,
        pattern: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self::Validation {
            command: command.into(),
            pattern: pattern.into(),
            payload: payload.into(),
        }
    }

    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Validation { .. } => {
                Some("The output was not cached; check --match against what the command prints")
            }
            Self::InvalidPattern { .. } => Some("Patterns use regex syntax, e.g. --match '^OK'"),
            _ => None,
        }
    }
}
