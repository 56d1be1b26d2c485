//! Derived cache paths
//!
//! When an invocation does not name a cache file explicitly, one is
//! derived from the command text: a filesystem-safe slug plus a
//! content hash. Same command line = same cache file, so repeated or
//! concurrent invocations coalesce with zero setup.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Maximum length of the human-readable slug portion
const SLUG_MAX: usize = 24;

/// Hash the command text using SHA256, returning first 12 hex chars
fn hash_command(cmd: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(cmd.as_bytes());
    let result = hasher.finalize();

    hex::encode(&result[..6])
}

/// Filesystem-safe prefix taken from the command text
fn slug(cmd: &str) -> String {
    let slug: String = cmd
        .chars()
        .take(SLUG_MAX)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();

    slug.trim_matches('-').to_string()
}

/// Cache file path for a command with no explicit `--cache-file`
pub fn derived_cache_file(cache_dir: &Path, cmd: &str) -> PathBuf {
    let slug = slug(cmd);
    let hash = hash_command(cmd);

    let name = if slug.is_empty() {
        format!("{hash}.cache")
    } else {
        format!("{slug}-{hash}.cache")
    };

    cache_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let dir = Path::new("/tmp/cachedir");
        let a = derived_cache_file(dir, "curl -s https://example.com");
        let b = derived_cache_file(dir, "curl -s https://example.com");
        assert_eq!(a, b);
    }

    #[test]
    fn different_commands_get_different_files() {
        let dir = Path::new("/tmp/cachedir");
        let a = derived_cache_file(dir, "date");
        let b = derived_cache_file(dir, "date -u");
        assert_ne!(a, b);
    }

    #[test]
    fn slug_is_filesystem_safe() {
        let path = derived_cache_file(Path::new("/c"), "curl -s 'http://x/?q=1'");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.'));
        assert!(name.starts_with("curl"));
        assert!(name.ends_with(".cache"));
    }

    #[test]
    fn unsluggable_command_still_derives() {
        let path = derived_cache_file(Path::new("/c"), "!!! ???");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(name.len(), "cafebabe1234.cache".len());
    }
}
