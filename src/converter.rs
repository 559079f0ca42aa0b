use std::path::{Path, PathBuf};

/// Reserved suffix marking an on-disk file as a placeholder rather than a
/// resident file. Kept short and visually distinct so a `find`/`ls` session
/// doesn't mistake it for a real extension.
pub const DEFAULT_DUMMY_SUFFIX: &str = ".hollow-placeholder";

/// Bijection between logical (mount) paths and on-disk cache paths, plus the
/// placeholder-suffix encoding.
///
/// Pure and stateless beyond its two configured strings -- every method is a
/// plain string/path transform with no I/O.
#[derive(Debug, Clone)]
pub struct PathConverter {
    cache_root: PathBuf,
    dummy_suffix: String,
}

impl PathConverter {
    pub fn new(cache_root: impl Into<PathBuf>, dummy_suffix: impl Into<String>) -> PathConverter {
        PathConverter {
            cache_root: cache_root.into(),
            dummy_suffix: dummy_suffix.into(),
        }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Map a logical (slash-separated, absolute) path to its on-disk cache path.
    pub fn to_cache_path(&self, logical_path: &str) -> PathBuf {
        self.cache_root.join(logical_path.trim_start_matches('/'))
    }

    /// Inverse of [`Self::to_cache_path`], for on-disk paths known to live under
    /// the cache root.
    pub fn to_logical_path(&self, cache_path: &Path) -> Option<String> {
        let rel = cache_path.strip_prefix(&self.cache_root).ok()?;
        Some(format!("/{}", rel.to_string_lossy()))
    }

    /// Append the dummy suffix to a cache path, producing its placeholder form.
    pub fn add_dummy_ending(&self, cache_path: &Path) -> PathBuf {
        let mut with_suffix = cache_path.as_os_str().to_os_string();
        with_suffix.push(&self.dummy_suffix);
        PathBuf::from(with_suffix)
    }

    /// Strip the dummy suffix from an on-disk entry name, so placeholders and
    /// resident files are indistinguishable to a directory listing.
    pub fn strip_dummy_ending<'a>(&self, name: &'a str) -> &'a str {
        name.strip_suffix(self.dummy_suffix.as_str()).unwrap_or(name)
    }

    /// Whether a cache path is in its placeholder form.
    pub fn is_dummy(&self, cache_path: &Path) -> bool {
        cache_path
            .as_os_str()
            .to_string_lossy()
            .ends_with(self.dummy_suffix.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn converter() -> PathConverter {
        PathConverter::new("/cache", DEFAULT_DUMMY_SUFFIX)
    }

    #[test]
    fn round_trips_logical_and_cache_paths() {
        let c = converter();
        let cache_path = c.to_cache_path("/a/b.txt");
        assert_eq!(cache_path, PathBuf::from("/cache/a/b.txt"));
        assert_eq!(c.to_logical_path(&cache_path).unwrap(), "/a/b.txt");
    }

    #[test]
    fn dummy_encoding_round_trips() {
        let c = converter();
        let cache_path = c.to_cache_path("/a/b.txt");
        let dummy = c.add_dummy_ending(&cache_path);
        assert!(c.is_dummy(&dummy));
        assert!(!c.is_dummy(&cache_path));
        assert_eq!(
            c.strip_dummy_ending(&dummy.file_name().unwrap().to_string_lossy()),
            "b.txt"
        );
    }
}
