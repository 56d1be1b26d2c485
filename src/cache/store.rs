//! Cache record persistence
//!
//! On-disk layout: the first line is the writer token (who produced
//! the record, and when), everything after the first newline is the
//! captured payload verbatim. The file's mtime is the record's age.
//!
//! An empty or missing file reads back as the sentinel record, which
//! the engine treats as "no usable response" and re-executes. A write
//! interrupted mid-truncate degrades to exactly that case, so the
//! format needs no checksum to stay safe.

use crate::error::{RuncachedError, RuncachedResult};
use chrono::Local;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// A cached command result as read back from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    /// First line of the file: opaque token identifying the execution
    /// that wrote the record
    pub writer_id: String,
    /// Captured stdout, verbatim
    pub payload: String,
    /// Time since the file was last written
    pub age: Duration,
}

impl CacheRecord {
    /// Sentinel for a missing or empty cache file
    pub fn empty() -> Self {
        Self {
            writer_id: String::new(),
            payload: String::new(),
            age: Duration::ZERO,
        }
    }
}

/// Freshly generated writer identity, unique per execution attempt.
///
/// Serialized as `<pid>-<uuid>: <local timestamp>`; the uuid keeps two
/// executions distinct even when they land on the same second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterToken(String);

impl WriterToken {
    pub fn fresh() -> Self {
        Self(format!(
            "{}-{}: {}",
            std::process::id(),
            Uuid::new_v4(),
            Local::now().format("%Y-%m-%d %H:%M:%S %z"),
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read the record at `path`. The caller holds at least a shared lock.
pub async fn read(path: &Path) -> RuncachedResult<CacheRecord> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CacheRecord::empty()),
        Err(e) => {
            return Err(RuncachedError::cache_io(
                format!("reading cache file {}", path.display()),
                e,
            ))
        }
    };

    if contents.is_empty() {
        return Ok(CacheRecord::empty());
    }

    let (writer_id, payload) = match contents.split_once('\n') {
        Some((writer, payload)) => (writer.to_string(), payload.to_string()),
        // Header line only: a record with an empty payload
        None => (contents, String::new()),
    };

    Ok(CacheRecord {
        writer_id,
        payload,
        age: file_age(path).await?,
    })
}

/// Overwrite the record at `path`. The caller holds the exclusive
/// lock; this function does no locking of its own.
pub async fn write(path: &Path, payload: &str, writer: &WriterToken) -> RuncachedResult<()> {
    let mut contents = String::with_capacity(writer.as_str().len() + 1 + payload.len());
    contents.push_str(writer.as_str());
    contents.push('\n');
    contents.push_str(payload);

    fs::write(path, contents).await.map_err(|e| {
        RuncachedError::cache_io(format!("writing cache file {}", path.display()), e)
    })?;

    // The payload may carry credentials or quota-bearing API responses
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms).map_err(|e| {
            RuncachedError::cache_io(
                format!("setting permissions on cache file {}", path.display()),
                e,
            )
        })?;
    }

    debug!(
        "Wrote {} byte payload to {} as {}",
        payload.len(),
        path.display(),
        writer.as_str()
    );
    Ok(())
}

async fn file_age(path: &Path) -> RuncachedResult<Duration> {
    let metadata = fs::metadata(path).await.map_err(|e| {
        RuncachedError::cache_io(format!("reading metadata of {}", path.display()), e)
    })?;

    let mtime = metadata.modified().map_err(|e| {
        RuncachedError::cache_io(format!("reading mtime of {}", path.display()), e)
    })?;

    // A clock step backwards reads as a brand-new record
    Ok(SystemTime::now()
        .duration_since(mtime)
        .unwrap_or(Duration::ZERO))
}
