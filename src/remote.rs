use std::io::Read;

use auto_impl::auto_impl;

use crate::inode::Inode;

/// The remote object store's download side. Upload is the worker's concern and
/// lives outside the core.
#[auto_impl(&)]
pub trait RemoteApi: Send + Sync {
    /// Open a byte stream for `inode`'s current remote content. Any error here
    /// is treated as a connection failure by the Cache (mapped to
    /// [`crate::error::CacheError::NetworkUnreachable`]).
    fn download(&self, inode: Inode) -> std::io::Result<Box<dyn Read + Send>>;
}
