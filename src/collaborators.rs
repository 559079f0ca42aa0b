//! Ready-to-use, in-process implementations of the Cache's four collaborators.
//!
//! These are real collaborators suitable for a single-process mount, not test
//! doubles -- the test suite happens to use them directly because they're the
//! simplest correct thing, the same way posy ships concrete
//! `KVFileStore`/`KVDirStore` implementations instead of leaving storage as a
//! bare trait with no default.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::inode::{Inode, InodeRegistry};
use crate::ranker::Ranker;
use crate::remote::RemoteApi;
use crate::state_store::StateStore;

/// `InodeRegistry` backed by two in-memory maps guarded by a single mutex.
pub struct InMemoryInodeRegistry {
    next_id: AtomicU64,
    table: Mutex<PathTable>,
}

#[derive(Default)]
struct PathTable {
    path_to_inode: HashMap<String, Inode>,
    inode_to_paths: HashMap<Inode, Vec<String>>,
}

impl InMemoryInodeRegistry {
    pub fn new() -> InMemoryInodeRegistry {
        InMemoryInodeRegistry {
            next_id: AtomicU64::new(1),
            table: Mutex::new(PathTable::default()),
        }
    }
}

impl Default for InMemoryInodeRegistry {
    fn default() -> Self {
        InMemoryInodeRegistry::new()
    }
}

impl InodeRegistry for InMemoryInodeRegistry {
    fn create_path(&self, path: &str) -> Inode {
        let inode = Inode::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut table = self.table.lock().unwrap();
        table.path_to_inode.insert(path.to_string(), inode);
        table.inode_to_paths.entry(inode).or_default().push(path.to_string());
        inode
    }

    fn delete_path(&self, path: &str) {
        let mut table = self.table.lock().unwrap();
        if let Some(inode) = table.path_to_inode.remove(path) {
            if let Some(paths) = table.inode_to_paths.get_mut(&inode) {
                paths.retain(|p| p != path);
                if paths.is_empty() {
                    table.inode_to_paths.remove(&inode);
                }
            }
        }
    }

    fn rename_paths(&self, old: &str, new: &str) {
        let mut table = self.table.lock().unwrap();
        if let Some(inode) = table.path_to_inode.remove(old) {
            table.path_to_inode.insert(new.to_string(), inode);
            if let Some(paths) = table.inode_to_paths.get_mut(&inode) {
                for p in paths.iter_mut() {
                    if p == old {
                        *p = new.to_string();
                    }
                }
            }
        }
    }

    fn get_inode(&self, path: &str) -> Option<Inode> {
        self.table.lock().unwrap().path_to_inode.get(path).copied()
    }

    fn get_paths(&self, inode: Inode) -> Vec<String> {
        self.table
            .lock()
            .unwrap()
            .inode_to_paths
            .get(&inode)
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentState {
    CleanLocal,
    Dirty,
    Remote,
    ToDelete,
}

/// `StateStore` backed by a single in-memory map of inode -> tag.
pub struct InMemoryStateStore {
    table: Mutex<HashMap<Inode, ContentState>>,
}

impl InMemoryStateStore {
    pub fn new() -> InMemoryStateStore {
        InMemoryStateStore {
            table: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        InMemoryStateStore::new()
    }
}

impl StateStore for InMemoryStateStore {
    fn set_dirty(&self, inode: Inode) {
        self.table.lock().unwrap().insert(inode, ContentState::Dirty);
    }

    fn set_remote(&self, inode: Inode) {
        self.table.lock().unwrap().insert(inode, ContentState::Remote);
    }

    fn set_downloaded(&self, inode: Inode) {
        self.table.lock().unwrap().insert(inode, ContentState::CleanLocal);
    }

    fn set_todelete(&self, inode: Inode) {
        self.table.lock().unwrap().insert(inode, ContentState::ToDelete);
    }

    fn is_clean(&self, inode: Inode) -> bool {
        self.table.lock().unwrap().get(&inode) == Some(&ContentState::CleanLocal)
    }

    fn is_remote(&self, inode: Inode) -> bool {
        self.table.lock().unwrap().get(&inode) == Some(&ContentState::Remote)
    }

    fn exists(&self, inode: Inode) -> bool {
        self.table.lock().unwrap().contains_key(&inode)
    }
}

/// A ranker that never dehydrates anything -- just logs what it was told.
/// Useful for embedding the Cache without a real eviction policy, and as the
/// default in the CLI entry point.
pub struct NullRanker;

impl Ranker for NullRanker {
    fn handle_inode_access(&self, inode: Inode) {
        log::trace!("ranker: access on inode {inode}");
    }

    fn handle_inode_delete(&self, inode: Inode) {
        log::trace!("ranker: delete on inode {inode}");
    }
}

/// A remote API with nothing behind it: every download fails. Useful for
/// exercising the cache's local-only operations (create/write/list/stat)
/// without a real object-store backend wired up.
pub struct NullRemote;

impl RemoteApi for NullRemote {
    fn download(&self, inode: Inode) -> std::io::Result<Box<dyn std::io::Read + Send>> {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotConnected,
            format!("no remote backend configured for inode {inode}"),
        ))
    }
}
