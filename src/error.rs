use crate::inode::Inode;
use thiserror::Error;

/// The error taxonomy the Cache surfaces to its filesystem-adapter caller.
///
/// Every variant but [`CacheError::Io`] corresponds to one of the named failure
/// modes in the taxonomy; `Io` is the passthrough bucket for whatever the
/// underlying OS call reported (EACCES, ENOSPC, EEXIST, ...), propagated unchanged.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("no such file or directory: {path}")]
    NotFound { path: String },

    #[error("network unreachable while hydrating inode {inode}")]
    NetworkUnreachable { inode: Inode },

    #[error("exhausted {retries} lock-acquisition retries for {path}")]
    LockRetryExhausted { path: String, retries: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;
