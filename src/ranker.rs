use auto_impl::auto_impl;

use crate::inode::Inode;

/// Receives access/delete signals and decides when to dehydrate resident
/// content back to a placeholder. Fire-and-forget: the Cache never awaits
/// either method, it just calls them once per operation, after the on-disk
/// effect has already landed.
#[auto_impl(&)]
pub trait Ranker: Send + Sync {
    fn handle_inode_access(&self, inode: Inode);
    fn handle_inode_delete(&self, inode: Inode);
}
