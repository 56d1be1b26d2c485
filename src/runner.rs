//! Command execution
//!
//! Abstracts the actual subprocess spawn behind a trait so the engine
//! can be exercised with a scripted runner in tests. The real runner
//! goes through `sh -c`, capturing stdout, stderr and the exit status.

use crate::error::{RuncachedError, RuncachedResult};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one command execution
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status code (-1 when terminated by a signal)
    pub status_code: i32,
    /// Captured standard output, verbatim
    pub stdout: String,
    /// Captured standard error, verbatim
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited zero
    pub fn success(&self) -> bool {
        self.status_code == 0
    }
}

/// Abstract command execution interface
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Execute the command text and capture its output
    async fn run(&self, cmd: &str) -> RuncachedResult<CommandOutput>;
}

/// Runs command text through `sh -c`
pub struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, cmd: &str) -> RuncachedResult<CommandOutput> {
        debug!("Executing: sh -c {:?}", cmd);

        let output = Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| RuncachedError::command_spawn(cmd, e))?;

        Ok(CommandOutput {
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
