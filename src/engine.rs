//! The reuse/run decision engine
//!
//! Orchestrates locking, snapshots, validation, execution and the
//! cache write into one protocol:
//!
//! 1. Read a pre-wait snapshot under a shared lock.
//! 2. Block on the exclusive lock, possibly for as long as another
//!    caller's execution takes.
//! 3. Read a post-wait snapshot under the held exclusive lock.
//! 4. Reuse the record when it validates and is inside the staleness
//!    window.
//! 5. Otherwise adopt the record without re-running when some other
//!    caller rewrote it while this one waited (the writer token
//!    changed) and it validates; re-run in every remaining case.
//!
//! Step 5 is the coalescing path: it is gated purely on writer
//! identity, independent of the staleness window, so a zero max-age
//! still serializes a burst of callers into a single execution.

use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::cache::lock::CacheLock;
use crate::cache::store::{self, CacheRecord, WriterToken};
use crate::error::{RuncachedError, RuncachedResult};
use crate::runner::{CommandRunner, ShellRunner};
use crate::validate::Validator;

/// One cached-execution request
#[derive(Debug, Clone)]
pub struct InvocationOptions {
    /// Shell command text, run via `sh -c`
    pub cmd: String,
    /// Data file holding the cached payload
    pub cache_file: PathBuf,
    /// Staleness window; zero disables time-based reuse entirely
    pub cache_max_age: Duration,
    /// Pattern the payload must match to be cached or reused
    pub pattern: String,
}

/// Writer-identity comparison across the blocking wait.
///
/// `expected` is the writer observed before this caller started
/// waiting for the exclusive lock; observing a different writer
/// afterwards means another caller refreshed the cache in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoalesceCheck {
    expected: String,
}

impl CoalesceCheck {
    /// Capture the writer identity of the pre-wait snapshot
    pub fn expecting(pre_wait: &CacheRecord) -> Self {
        Self {
            expected: pre_wait.writer_id.clone(),
        }
    }

    /// True when the record was rewritten while this caller waited
    pub fn writer_changed(&self, post_wait: &CacheRecord) -> bool {
        post_wait.writer_id != self.expected
    }
}

/// Run a command through the cache with the default shell runner
pub async fn run(options: &InvocationOptions) -> RuncachedResult<String> {
    run_with(options, &ShellRunner).await
}

/// Blocking calling convention with identical semantics to [`run`]
pub fn run_blocking(options: &InvocationOptions) -> RuncachedResult<String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| RuncachedError::io("building blocking runtime", e))?;

    runtime.block_on(run(options))
}

/// Run a command through the cache with an explicit runner
pub async fn run_with<R>(options: &InvocationOptions, runner: &R) -> RuncachedResult<String>
where
    R: CommandRunner + ?Sized,
{
    let validator = Validator::new(&options.pattern)?;

    // Pre-wait snapshot: the writer known at arrival time.
    let pre_wait = {
        let _shared = CacheLock::shared(&options.cache_file).await?;
        store::read(&options.cache_file).await?
    };
    let check = CoalesceCheck::expecting(&pre_wait);

    // Blocks while another caller executes; unbounded by design.
    let _guard = CacheLock::exclusive(&options.cache_file).await?;
    let current = store::read(&options.cache_file).await?;

    // An empty payload never validates, so `valid` implies non-empty.
    let valid = validator.is_match(&current.payload);

    if valid && options.cache_max_age > Duration::ZERO && current.age < options.cache_max_age {
        debug!(
            "Reusing cached result from {} ({:.1}s old)",
            options.cache_file.display(),
            current.age.as_secs_f64()
        );
        return Ok(current.payload);
    }

    // Coalescing: the record was rewritten while this caller waited
    // for the lock. Adopt it if it validates, even with the staleness
    // window shut; re-running here is exactly the redundant execution
    // the protocol exists to suppress.
    if valid && check.writer_changed(&current) {
        debug!(
            "Adopting result written by {} while waiting for the lock",
            current.writer_id
        );
        return Ok(current.payload);
    }

    info!("Executing: {}", options.cmd);
    let output = runner.run(&options.cmd).await?;

    if !output.success() {
        return Err(RuncachedError::command_exec(&options.cmd, &output.stderr));
    }

    if !validator.is_match(&output.stdout) {
        return Err(RuncachedError::validation(
            &options.cmd,
            validator.pattern(),
            output.stdout,
        ));
    }

    // Still inside the exclusive critical section.
    let token = WriterToken::fresh();
    store::write(&options.cache_file, &output.stdout, &token).await?;

    Ok(output.stdout)
}
