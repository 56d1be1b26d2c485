//! Runcached - host-wide cached command execution
//!
//! Runs an expensive or rate-limited shell command at most once per
//! staleness window, coordinating concurrent callers across processes
//! through an advisory file lock so a burst of invocations produces a
//! single real execution.

pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod runner;
pub mod validate;

pub use engine::{run, run_blocking, InvocationOptions};
pub use error::{RuncachedError, RuncachedResult};
