use std::path::PathBuf;

use crate::converter::DEFAULT_DUMMY_SUFFIX;
use crate::prelude::PROJECT_DIRS;

/// Knobs the Cache is constructed with: where the on-disk mirror lives, what
/// suffix marks a placeholder, and how many times a path-lock acquisition
/// retries before giving up.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub cache_root: PathBuf,
    pub dummy_suffix: String,
    /// Retry bound for ordinary operations (§4.2: 100).
    pub lock_retries: u32,
    /// Retry bound for `unlink` specifically (§4.2: 10).
    pub unlink_lock_retries: u32,
}

impl Default for CacheConfig {
    fn default() -> CacheConfig {
        CacheConfig {
            cache_root: PROJECT_DIRS.cache_dir().join("mount"),
            dummy_suffix: DEFAULT_DUMMY_SUFFIX.to_string(),
            lock_retries: 100,
            unlink_lock_retries: 10,
        }
    }
}

impl CacheConfig {
    pub fn new(cache_root: impl Into<PathBuf>) -> CacheConfig {
        CacheConfig {
            cache_root: cache_root.into(),
            ..CacheConfig::default()
        }
    }
}
