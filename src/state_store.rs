use auto_impl::auto_impl;

use crate::inode::Inode;

/// Per-inode content-state tag: clean-local, dirty, remote, or to-delete.
///
/// Implementations must be internally thread-safe: the Cache does not serialize
/// access beyond what the path lock already provides.
#[auto_impl(&)]
pub trait StateStore: Send + Sync {
    /// `create` / `write` / `truncate`: bytes resident, upload owed.
    fn set_dirty(&self, inode: Inode);

    /// `create_dummy`: bytes not resident, placeholder present.
    fn set_remote(&self, inode: Inode);

    /// `replace_dummy` / successful upload: bytes resident, agrees with remote.
    fn set_downloaded(&self, inode: Inode);

    /// `_delete_file`: logically removed, unlink of remote still owed.
    fn set_todelete(&self, inode: Inode);

    /// True only in the clean-local state (dehydration precondition).
    fn is_clean(&self, inode: Inode) -> bool;

    /// True only in the remote state (hydration precondition).
    fn is_remote(&self, inode: Inode) -> bool;

    /// Whether the store holds any tag at all for `inode` -- directories never
    /// get one, so this also doubles as a file/directory discriminator.
    fn exists(&self, inode: Inode) -> bool;
}
