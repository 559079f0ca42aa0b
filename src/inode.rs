use std::fmt;

use auto_impl::auto_impl;

/// Stable opaque identifier for a file's logical identity.
///
/// Assigned by the inode registry when a path is first created. An inode may be
/// reachable by multiple logical paths and outlives any particular one of them;
/// placeholder <-> resident conversions never change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Inode(u64);

impl Inode {
    pub fn from_raw(raw: u64) -> Inode {
        Inode(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Inode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps logical paths to stable inode identifiers.
///
/// Implementations must be internally thread-safe: the Cache does not serialize
/// access to the registry beyond what the path lock already provides.
#[auto_impl(&)]
pub trait InodeRegistry: Send + Sync {
    /// Register `path` as a brand-new inode (used by `create` and `mkdir`).
    fn create_path(&self, path: &str) -> Inode;

    /// Deregister `path`. If it was the inode's last path, the inode itself
    /// stops being known to the registry.
    fn delete_path(&self, path: &str);

    /// Move the registration of `old` to `new`, preserving the inode identity.
    fn rename_paths(&self, old: &str, new: &str);

    /// Look up the inode currently registered at `path`, if any.
    fn get_inode(&self, path: &str) -> Option<Inode>;

    /// All paths currently registered for `inode`, in registration order. The
    /// first entry is the canonical path used whenever the Cache needs one.
    fn get_paths(&self, inode: Inode) -> Vec<String>;
}
