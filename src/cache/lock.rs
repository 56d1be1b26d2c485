//! Advisory file locking over the cache sidecar
//!
//! The sidecar (`<cache_file>.lock`) is created on first use and never
//! removed; its content is irrelevant. An exclusive hold gives
//! host-wide mutual exclusion across processes; shared holds coexist
//! with each other and block only while an exclusive holder is active.
//!
//! Acquisition blocks without bound. Each acquisition opens its own
//! file descriptor, so several concurrent attempts from one process
//! queue on the kernel lock instead of deadlocking each other. The
//! blocking wait runs on the blocking thread pool so it never stalls
//! the async runtime; release happens when the guard drops, on every
//! exit path.

use crate::error::{RuncachedError, RuncachedResult};
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockMode {
    Shared,
    Exclusive,
}

/// A held advisory lock, released on drop
pub struct CacheLock {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl CacheLock {
    /// Sidecar lock path for a cache file: `<cache_file>.lock`
    pub fn sidecar(cache_file: &Path) -> PathBuf {
        let mut path = cache_file.as_os_str().to_owned();
        path.push(".lock");
        PathBuf::from(path)
    }

    /// Block until exclusive ownership of the cache's lock is granted
    pub async fn exclusive(cache_file: &Path) -> RuncachedResult<Self> {
        Self::acquire(cache_file, LockMode::Exclusive).await
    }

    /// Block until a shared hold on the cache's lock is granted
    pub async fn shared(cache_file: &Path) -> RuncachedResult<Self> {
        Self::acquire(cache_file, LockMode::Shared).await
    }

    async fn acquire(cache_file: &Path, mode: LockMode) -> RuncachedResult<Self> {
        let path = Self::sidecar(cache_file);
        let lock_path = path.clone();

        let file = task::spawn_blocking(move || -> std::io::Result<File> {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&lock_path)?;

            match mode {
                LockMode::Exclusive => FileExt::lock_exclusive(&file)?,
                LockMode::Shared => FileExt::lock_shared(&file)?,
            }

            Ok(file)
        })
        .await
        .map_err(|e| RuncachedError::io("joining lock acquisition task", std::io::Error::other(e)))?
        .map_err(|e| RuncachedError::lock(&path, e))?;

        debug!("Acquired {:?} lock on {}", mode, path.display());
        Ok(Self { file, path, mode })
    }

    /// The sidecar path this lock covers
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        // Closing the descriptor would release the lock anyway, but
        // unlock explicitly so the release is not tied to fd lifetime.
        if let Err(e) = FileExt::unlock(&self.file) {
            trace!(
                "Failed to unlock {:?} lock on {}: {}",
                self.mode,
                self.path.display(),
                e
            );
        }
    }
}
