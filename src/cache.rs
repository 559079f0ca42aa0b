//! The Cache: mediates every filesystem callback, maintains the invariant
//! linking on-disk state to logical file identity, and drives the
//! resident/placeholder/to-delete state machine.
//!
//! Three explicit resolution strategies replace the call-site decorators
//! (`on_cache_path`, `on_cache_path_or_dummy`, `on_cache_path_enforce_local`)
//! of a decorator-based design: [`Cache::resolve_cache_path`] (pure, no disk
//! check), [`Cache::resolve_tolerant`] (whichever on-disk form exists), and
//! [`Cache::resolve_strict`] (hydrates a placeholder in place).

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::{DirBuilderExt, FileExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

use log::{trace, warn};

use crate::config::CacheConfig;
use crate::converter::PathConverter;
use crate::error::{CacheError, Result};
use crate::inode::{Inode, InodeRegistry};
use crate::path_lock::{LockMode, PathLockManager};
use crate::ranker::Ranker;
use crate::remote::RemoteApi;
use crate::stat::{self, StatDict};
use crate::state_store::StateStore;

/// Open flags a filesystem adapter would translate from its own `open(2)`
/// flags. Deliberately small and OS-agnostic; an adapter maps its native flag
/// bits onto this before calling [`Cache::open`] or [`Cache::create`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFlags {
    pub read: bool,
    pub write: bool,
    pub append: bool,
    pub truncate: bool,
    pub create: bool,
}

/// The core cache/placeholder state machine. Owns the path converter and the
/// path-lock manager; borrows its four collaborators (inode registry, state
/// store, ranker, remote API) for the Cache's own lifetime, which in practice
/// is the lifetime of the mount.
pub struct Cache<'a> {
    converter: PathConverter,
    locks: PathLockManager,
    inode_registry: &'a dyn InodeRegistry,
    state_store: &'a dyn StateStore,
    ranker: &'a dyn Ranker,
    remote: &'a dyn RemoteApi,
    lock_retries: u32,
    unlink_lock_retries: u32,
}

impl<'a> Cache<'a> {
    pub fn new(
        config: &CacheConfig,
        inode_registry: &'a dyn InodeRegistry,
        state_store: &'a dyn StateStore,
        ranker: &'a dyn Ranker,
        remote: &'a dyn RemoteApi,
    ) -> Cache<'a> {
        Cache {
            converter: PathConverter::new(config.cache_root.clone(), config.dummy_suffix.clone()),
            locks: PathLockManager::new(),
            inode_registry,
            state_store,
            ranker,
            remote,
            lock_retries: config.lock_retries,
            unlink_lock_retries: config.unlink_lock_retries,
        }
    }

    pub fn converter(&self) -> &PathConverter {
        &self.converter
    }

    // ---- path resolution ---------------------------------------------------

    /// Pure conversion, no disk check.
    fn resolve_cache_path(&self, logical_path: &str) -> PathBuf {
        self.converter.to_cache_path(logical_path)
    }

    /// Whichever on-disk form exists, or `None` if neither does.
    fn resolve_tolerant(&self, logical_path: &str) -> Option<PathBuf> {
        let cache_path = self.converter.to_cache_path(logical_path);
        let dummy_path = self.converter.add_dummy_ending(&cache_path);
        if cache_path.exists() {
            Some(cache_path)
        } else if dummy_path.exists() {
            Some(dummy_path)
        } else {
            None
        }
    }

    /// Resident cache path, hydrating a placeholder in place first if needed.
    ///
    /// Invokes hydration *without* acquiring the path lock -- callers must
    /// already hold it. This inverts the usual ownership (normally a
    /// background worker drives hydration) but keeps the
    /// lock-then-resolve-then-act sequence inside a single critical section.
    fn resolve_strict(&self, logical_path: &str) -> Result<PathBuf> {
        let cache_path = self.converter.to_cache_path(logical_path);
        let dummy_path = self.converter.add_dummy_ending(&cache_path);
        if dummy_path.exists() {
            let inode = self
                .inode_registry
                .get_inode(logical_path)
                .ok_or_else(|| CacheError::NotFound { path: logical_path.to_string() })?;
            self.hydrate(inode, &cache_path, &dummy_path)?;
        }
        Ok(cache_path)
    }

    // ---- public operations --------------------------------------------------

    /// Directory listing. No lock: relies on the directory entries themselves
    /// already being consistent once this call observes them.
    pub fn list(&self, dir_path: &str, _fh: Option<u64>) -> Result<Vec<String>> {
        let cache_dir = self.converter.to_cache_path(dir_path);
        let mut names = vec![".".to_string(), "..".to_string()];
        for entry in fs::read_dir(&cache_dir)? {
            let entry = entry?;
            let raw = entry.file_name();
            let raw = raw.to_string_lossy();
            names.push(self.converter.strip_dummy_ending(&raw).to_string());
        }
        Ok(names)
    }

    pub fn open(&self, path: &str, flags: OpenFlags) -> Result<File> {
        let _guard = self.locks.acquire(path, LockMode::Exclusive, true, self.lock_retries)?;
        let cache_path = self.resolve_strict(path)?;
        trace!("open {path} -> {}", cache_path.display());
        Ok(OpenOptions::new()
            .read(flags.read)
            .write(flags.write)
            .append(flags.append)
            .truncate(flags.truncate)
            .create(flags.create)
            .open(cache_path)?)
    }

    /// Reads and writes use `pread`/`pwrite` semantics (`FileExt::read_at` /
    /// `write_at`) rather than `seek` + `read`/`write`, so concurrent
    /// shared-leaf readers on the same handle don't race each other's cursor.
    pub fn read(&self, path: &str, size: usize, offset: u64, fh: &File) -> Result<Vec<u8>> {
        let _guard = self.locks.acquire(path, LockMode::SharedLeaf, true, self.lock_retries)?;
        let inode = self
            .inode_registry
            .get_inode(path)
            .ok_or_else(|| CacheError::NotFound { path: path.to_string() })?;

        let mut buf = vec![0u8; size];
        let n = read_at_best_effort(fh, &mut buf, offset)?;
        buf.truncate(n);
        self.ranker.handle_inode_access(inode);
        Ok(buf)
    }

    pub fn write(&self, path: &str, data: &[u8], offset: u64, fh: &File) -> Result<usize> {
        let _guard = self.locks.acquire(path, LockMode::Exclusive, true, self.lock_retries)?;
        let inode = self
            .inode_registry
            .get_inode(path)
            .ok_or_else(|| CacheError::NotFound { path: path.to_string() })?;

        fh.write_all_at(data, offset)?;
        self.state_store.set_dirty(inode);
        self.ranker.handle_inode_access(inode);
        Ok(data.len())
    }

    pub fn truncate(&self, path: &str, length: u64) -> Result<()> {
        let _guard = self.locks.acquire(path, LockMode::Exclusive, true, self.lock_retries)?;
        let inode = self
            .inode_registry
            .get_inode(path)
            .ok_or_else(|| CacheError::NotFound { path: path.to_string() })?;
        let cache_path = self.resolve_strict(path)?;

        let file = OpenOptions::new().write(true).open(&cache_path)?;
        file.set_len(length)?;
        self.state_store.set_dirty(inode);
        self.ranker.handle_inode_access(inode);
        Ok(())
    }

    pub fn create(&self, path: &str, mode: u32) -> Result<File> {
        let _guard = self.locks.acquire(path, LockMode::Exclusive, true, self.lock_retries)?;
        let cache_path = self.resolve_cache_path(path);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(mode)
            .open(&cache_path)?;

        let inode = self.inode_registry.create_path(path);
        self.state_store.set_dirty(inode);
        self.ranker.handle_inode_access(inode);
        Ok(file)
    }

    pub fn mkdir(&self, path: &str, mode: u32) -> Result<()> {
        let _guard = self.locks.acquire(path, LockMode::Exclusive, true, self.lock_retries)?;
        let cache_path = self.resolve_cache_path(path);
        self.inode_registry.create_path(path);
        fs::DirBuilder::new().mode(mode).create(&cache_path)?;
        Ok(())
    }

    pub fn rmdir(&self, path: &str) -> Result<()> {
        let _guard = self.locks.acquire(path, LockMode::Exclusive, true, self.lock_retries)?;
        let cache_path = self.resolve_cache_path(path);
        self.inode_registry.delete_path(path);
        fs::remove_dir(&cache_path)?;
        Ok(())
    }

    pub fn unlink(&self, path: &str) -> Result<()> {
        let _guard = self.locks.acquire(path, LockMode::Exclusive, true, self.unlink_lock_retries)?;
        let cache_path = self
            .resolve_tolerant(path)
            .ok_or_else(|| CacheError::NotFound { path: path.to_string() })?;

        if fs::symlink_metadata(&cache_path)?.file_type().is_symlink() {
            fs::remove_file(&cache_path)?;
            return Ok(());
        }
        self.delete_file(path)
    }

    /// Shared by `unlink` and `rename`: deregisters the path, removes whichever
    /// on-disk form exists, and marks the inode to-delete so the (external)
    /// worker propagates the deletion to the remote. Caller must already hold
    /// `path`'s lock.
    fn delete_file(&self, path: &str) -> Result<()> {
        let inode = self
            .inode_registry
            .get_inode(path)
            .ok_or_else(|| CacheError::NotFound { path: path.to_string() })?;
        let cache_path = self
            .resolve_tolerant(path)
            .ok_or_else(|| CacheError::NotFound { path: path.to_string() })?;

        self.inode_registry.delete_path(path);
        fs::remove_file(&cache_path)?;
        self.ranker.handle_inode_delete(inode);
        self.state_store.set_todelete(inode);
        Ok(())
    }

    /// Known race, accepted rather than fixed: between checking whether `new`
    /// exists and re-locking it, another caller can create `new`. A
    /// canonical-order dual-lock would close the window, but isn't what this
    /// crate does, to stay faithful to the documented design choice.
    pub fn rename(&self, old: &str, new: &str) -> Result<()> {
        let _old_guard = self.locks.acquire(old, LockMode::Exclusive, true, self.lock_retries)?;

        if let Some(existing) = self.inode_registry.get_inode(new) {
            if self.state_store.exists(existing) {
                let _new_guard = self.locks.acquire(new, LockMode::Exclusive, true, self.lock_retries)?;
                self.delete_file(new)?;
            } else {
                self.rmdir(new)?;
            }
        }

        let old_cache = self.converter.to_cache_path(old);
        let new_cache = self.converter.to_cache_path(new);
        fs::rename(&old_cache, &new_cache)?;
        self.inode_registry.rename_paths(old, new);
        Ok(())
    }

    /// No lock: a pure stat read, tolerant of either on-disk form.
    pub fn getattributes(&self, path: &str) -> Result<StatDict> {
        let cache_path = self
            .resolve_tolerant(path)
            .ok_or_else(|| CacheError::NotFound { path: path.to_string() })?;
        if self.converter.is_dummy(&cache_path) {
            stat::read_stat_dict(&cache_path)
        } else {
            stat::stat_dict_for(&cache_path)
        }
    }

    // ---- placeholder <-> resident conversion --------------------------------

    /// Placeholder -> resident. Preconditions (remote state, placeholder
    /// present) are checked inline; a failed precondition logs and returns
    /// `Ok(())` rather than raising.
    fn hydrate(&self, inode: Inode, cache_path: &Path, dummy_path: &Path) -> Result<()> {
        if !self.state_store.is_remote(inode) {
            warn!("cannot hydrate inode {inode}: not in remote state");
            return Ok(());
        }

        let stat = stat::read_stat_dict(dummy_path)?;
        fs::rename(dummy_path, cache_path)?;

        {
            let mut file = OpenOptions::new().write(true).truncate(true).open(cache_path)?;
            let mut reader = self
                .remote
                .download(inode)
                .map_err(|_| CacheError::NetworkUnreachable { inode })?;
            // A failure here deliberately leaves the (now-empty-or-partial)
            // file in place rather than reverting to the placeholder.
            io::copy(&mut reader, &mut file).map_err(|_| CacheError::NetworkUnreachable { inode })?;
        }

        stat::restore_times_from_stat(cache_path, &stat)?;
        self.state_store.set_downloaded(inode);
        Ok(())
    }

    /// Resident -> placeholder, for the ranker to call once it decides an
    /// inode should be evicted. Takes the path lock itself (the ranker runs
    /// outside the callback path, so no caller already holds it).
    pub fn create_dummy(&self, inode: Inode) -> Result<()> {
        let paths = self.inode_registry.get_paths(inode);
        let Some(path) = paths.first() else {
            warn!("cannot create dummy for inode {inode}: no known path");
            return Ok(());
        };
        let _guard = self.locks.acquire(path, LockMode::Exclusive, false, self.lock_retries)?;

        if !self.state_store.is_clean(inode) {
            warn!("cannot create dummy for inode {inode}: not clean-local");
            return Ok(());
        }

        let cache_path = self.converter.to_cache_path(path);
        let stat = stat::stat_dict_for(&cache_path)?;
        let dummy_path = self.converter.add_dummy_ending(&cache_path);

        // Rename first so the placeholder inherits the original's owner,
        // group, mode and ctime; only then overwrite its contents with the
        // serialized stat, without letting that write bump its own times.
        fs::rename(&cache_path, &dummy_path)?;
        stat::write_stat_dict_without_touching_times(&dummy_path, &stat)?;
        self.state_store.set_remote(inode);
        Ok(())
    }

    /// Placeholder -> resident, for the worker/ranker to call directly (rather
    /// than waiting for the next `open`). Takes the path lock itself.
    pub fn replace_dummy(&self, inode: Inode) -> Result<()> {
        let paths = self.inode_registry.get_paths(inode);
        let Some(path) = paths.first() else {
            return Err(CacheError::NotFound { path: format!("inode {inode}") });
        };
        let _guard = self.locks.acquire(path, LockMode::Exclusive, false, self.lock_retries)?;
        let cache_path = self.converter.to_cache_path(path);
        let dummy_path = self.converter.add_dummy_ending(&cache_path);
        self.hydrate(inode, &cache_path, &dummy_path)
    }
}

fn read_at_best_effort(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    let mut total = 0;
    loop {
        match file.read_at(&mut buf[total..], offset + total as u64) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
        if total == buf.len() {
            break;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::collaborators::{InMemoryInodeRegistry, InMemoryStateStore};
    use std::io::{Cursor, Read};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    struct RecordingRanker {
        accesses: StdMutex<Vec<Inode>>,
        deletes: StdMutex<Vec<Inode>>,
    }

    impl RecordingRanker {
        fn new() -> RecordingRanker {
            RecordingRanker { accesses: StdMutex::new(Vec::new()), deletes: StdMutex::new(Vec::new()) }
        }
    }

    impl Ranker for RecordingRanker {
        fn handle_inode_access(&self, inode: Inode) {
            self.accesses.lock().unwrap().push(inode);
        }
        fn handle_inode_delete(&self, inode: Inode) {
            self.deletes.lock().unwrap().push(inode);
        }
    }

    struct StaticRemote {
        bytes: &'static [u8],
        fail: AtomicUsize,
    }

    impl RemoteApi for StaticRemote {
        fn download(&self, _inode: Inode) -> io::Result<Box<dyn Read + Send>> {
            if self.fail.load(Ordering::SeqCst) > 0 {
                self.fail.fetch_sub(1, Ordering::SeqCst);
                return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "down"));
            }
            Ok(Box::new(Cursor::new(self.bytes)))
        }
    }

    fn test_cache<'a>(
        config: &CacheConfig,
        registry: &'a InMemoryInodeRegistry,
        states: &'a InMemoryStateStore,
        ranker: &'a RecordingRanker,
        remote: &'a StaticRemote,
    ) -> Cache<'a> {
        Cache::new(config, registry, states, ranker, remote)
    }

    #[test]
    fn create_write_getattributes_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(dir.path());
        let registry = InMemoryInodeRegistry::new();
        let states = InMemoryStateStore::new();
        let ranker = RecordingRanker::new();
        let remote = StaticRemote { bytes: b"xyz", fail: AtomicUsize::new(0) };
        let cache = test_cache(&config, &registry, &states, &ranker, &remote);

        let file = cache.create("/a", 0o644).unwrap();
        let n = cache.write("/a", b"hello", 0, &file).unwrap();
        assert_eq!(n, 5);

        let inode = registry.get_inode("/a").unwrap();
        assert!(states.exists(inode));
        assert!(!states.is_clean(inode));

        let stat = cache.getattributes("/a").unwrap();
        assert_eq!(stat.st_size, 5);
    }

    #[test]
    fn open_hydrates_placeholder_and_restores_times() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(dir.path());
        let registry = InMemoryInodeRegistry::new();
        let states = InMemoryStateStore::new();
        let ranker = RecordingRanker::new();
        let remote = StaticRemote { bytes: b"xyz", fail: AtomicUsize::new(0) };
        let cache = test_cache(&config, &registry, &states, &ranker, &remote);

        let inode = registry.create_path("/b");
        states.set_remote(inode);
        let cache_path = cache.converter().to_cache_path("/b");
        let dummy_path = cache.converter().add_dummy_ending(&cache_path);
        let stat = StatDict {
            st_mode: 0o100644,
            st_uid: 0,
            st_gid: 0,
            st_size: 3,
            st_atime: 1000,
            st_mtime: 2000,
            st_ctime: 2000,
        };
        fs::write(&dummy_path, serde_json::to_vec(&stat).unwrap()).unwrap();

        let file = cache.open("/b", OpenFlags { read: true, ..Default::default() }).unwrap();
        drop(file);

        assert!(cache_path.exists());
        assert!(!dummy_path.exists());
        assert_eq!(fs::read(&cache_path).unwrap(), b"xyz");
        assert!(states.is_clean(inode));

        let meta = fs::metadata(&cache_path).unwrap();
        use std::os::unix::fs::MetadataExt;
        assert_eq!(meta.mtime(), 2000);
    }

    #[test]
    fn open_surfaces_network_unreachable_and_retries_next_time() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(dir.path());
        let registry = InMemoryInodeRegistry::new();
        let states = InMemoryStateStore::new();
        let ranker = RecordingRanker::new();
        let remote = StaticRemote { bytes: b"xyz", fail: AtomicUsize::new(1) };
        let cache = test_cache(&config, &registry, &states, &ranker, &remote);

        let inode = registry.create_path("/c");
        states.set_remote(inode);
        let cache_path = cache.converter().to_cache_path("/c");
        let dummy_path = cache.converter().add_dummy_ending(&cache_path);
        let stat = StatDict {
            st_mode: 0o100644,
            st_uid: 0,
            st_gid: 0,
            st_size: 0,
            st_atime: 1,
            st_mtime: 2,
            st_ctime: 2,
        };
        fs::write(&dummy_path, serde_json::to_vec(&stat).unwrap()).unwrap();

        let err = cache.open("/c", OpenFlags { read: true, ..Default::default() }).unwrap_err();
        assert!(matches!(err, CacheError::NetworkUnreachable { .. }));
        // documented bug: placeholder is gone, bare file left in its place
        assert!(cache_path.exists());
        assert!(!dummy_path.exists());

        // retry: next open sees the bare file, not the placeholder, and just
        // opens it -- no hydration attempted again.
        let file = cache.open("/c", OpenFlags { read: true, ..Default::default() }).unwrap();
        drop(file);
    }

    #[test]
    fn create_dummy_is_a_no_op_when_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(dir.path());
        let registry = InMemoryInodeRegistry::new();
        let states = InMemoryStateStore::new();
        let ranker = RecordingRanker::new();
        let remote = StaticRemote { bytes: b"", fail: AtomicUsize::new(0) };
        let cache = test_cache(&config, &registry, &states, &ranker, &remote);

        let file = cache.create("/d", 0o644).unwrap();
        cache.write("/d", b"hi", 0, &file).unwrap();
        let inode = registry.get_inode("/d").unwrap();
        assert!(!states.is_clean(inode));

        cache.create_dummy(inode).unwrap();

        assert!(!states.is_remote(inode));
        let cache_path = cache.converter().to_cache_path("/d");
        assert_eq!(fs::read(cache_path).unwrap(), b"hi");
    }

    #[test]
    fn dehydrate_then_hydrate_restores_times_and_mode() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(dir.path());
        let registry = InMemoryInodeRegistry::new();
        let states = InMemoryStateStore::new();
        let ranker = RecordingRanker::new();
        let remote = StaticRemote { bytes: b"payload", fail: AtomicUsize::new(0) };
        let cache = test_cache(&config, &registry, &states, &ranker, &remote);

        let file = cache.create("/e", 0o640).unwrap();
        cache.write("/e", b"payload", 0, &file).unwrap();
        let inode = registry.get_inode("/e").unwrap();
        states.set_downloaded(inode); // simulate upload completing -> clean-local

        let before = cache.getattributes("/e").unwrap();

        cache.create_dummy(inode).unwrap();
        assert!(states.is_remote(inode));

        cache.replace_dummy(inode).unwrap();
        assert!(states.is_clean(inode));

        let after = cache.getattributes("/e").unwrap();
        assert_eq!(after.st_mode, before.st_mode);
        assert!((after.st_mtime - before.st_mtime).abs() <= 1);
        assert!((after.st_atime - before.st_atime).abs() <= 1);
    }

    #[test]
    fn unlink_marks_todelete_and_removes_on_disk_form() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(dir.path());
        let registry = InMemoryInodeRegistry::new();
        let states = InMemoryStateStore::new();
        let ranker = RecordingRanker::new();
        let remote = StaticRemote { bytes: b"", fail: AtomicUsize::new(0) };
        let cache = test_cache(&config, &registry, &states, &ranker, &remote);

        let file = cache.create("/f", 0o644).unwrap();
        drop(file);
        let inode = registry.get_inode("/f").unwrap();

        cache.unlink("/f").unwrap();

        assert_eq!(registry.get_inode("/f"), None);
        assert!(!cache.converter().to_cache_path("/f").exists());
        assert!(ranker.deletes.lock().unwrap().contains(&inode));
    }

    #[test]
    fn rename_replaces_existing_file_at_destination() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(dir.path());
        let registry = InMemoryInodeRegistry::new();
        let states = InMemoryStateStore::new();
        let ranker = RecordingRanker::new();
        let remote = StaticRemote { bytes: b"", fail: AtomicUsize::new(0) };
        let cache = test_cache(&config, &registry, &states, &ranker, &remote);

        let a = cache.create("/a", 0o644).unwrap();
        drop(a);
        let old_inode_of_a = registry.get_inode("/a").unwrap();
        let b = cache.create("/b", 0o644).unwrap();
        drop(b);
        let old_inode_of_b = registry.get_inode("/b").unwrap();

        cache.rename("/a", "/b").unwrap();

        assert_eq!(registry.get_inode("/a"), None);
        assert_eq!(registry.get_inode("/b"), Some(old_inode_of_a));
        assert!(ranker.deletes.lock().unwrap().contains(&old_inode_of_b));
    }

    #[test]
    fn list_strips_dummy_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(dir.path());
        let registry = InMemoryInodeRegistry::new();
        let states = InMemoryStateStore::new();
        let ranker = RecordingRanker::new();
        let remote = StaticRemote { bytes: b"", fail: AtomicUsize::new(0) };
        let cache = test_cache(&config, &registry, &states, &ranker, &remote);

        cache.mkdir("/d", 0o755).unwrap();
        let f = cache.create("/d/real", 0o644).unwrap();
        drop(f);

        let dummy_cache_path = cache.converter().to_cache_path("/d/ghost");
        let dummy_path = cache.converter().add_dummy_ending(&dummy_cache_path);
        let stat = StatDict { st_mode: 0o100644, st_uid: 0, st_gid: 0, st_size: 0, st_atime: 0, st_mtime: 0, st_ctime: 0 };
        fs::write(&dummy_path, serde_json::to_vec(&stat).unwrap()).unwrap();

        let mut names = cache.list("/d", None).unwrap();
        names.sort();
        assert_eq!(names, vec![".".to_string(), "..".to_string(), "ghost".to_string(), "real".to_string()]);
    }
}
