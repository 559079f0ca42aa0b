#![forbid(unsafe_code)]

pub mod cache;
pub mod collaborators;
pub mod config;
pub mod converter;
pub mod error;
pub mod inode;
pub mod output;
pub mod path_lock;
pub mod prelude;
pub mod ranker;
pub mod remote;
pub mod stat;
pub mod state_store;

pub use cache::{Cache, OpenFlags};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use inode::{Inode, InodeRegistry};
pub use ranker::Ranker;
pub use remote::RemoteApi;
pub use state_store::StateStore;
