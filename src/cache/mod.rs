//! Cache coordination primitives
//!
//! One cached command = one data file plus one `.lock` sidecar. The
//! sidecar carries an OS advisory lock; the data file carries a writer
//! token on its first line and the payload after it, with its mtime
//! serving as the record's age.
//!
//! # Locking discipline
//!
//! | Operation | Lock held by caller |
//! |-----------|---------------------|
//! | `store::read` (pre-wait snapshot) | shared |
//! | `store::read` (post-wait snapshot) | exclusive |
//! | `store::write` | exclusive |
//!
//! The store itself never locks; exclusivity is the engine's job.

pub mod key;
pub mod lock;
pub mod store;

pub use key::derived_cache_file;
pub use lock::CacheLock;
pub use store::{CacheRecord, WriterToken};
