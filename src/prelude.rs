pub use std::collections::HashMap;
pub use std::fmt::Display;

pub use anyhow::{Context, Result};
pub use once_cell::sync::Lazy;
pub use serde::{Deserialize, Serialize};
pub use log::{debug, info, trace, warn};

pub use crate::error::CacheError;
pub use crate::inode::Inode;

use directories::ProjectDirs;

/// Project directories, used only to pick a sane default cache root for the
/// CLI when the caller doesn't specify one explicitly.
pub static PROJECT_DIRS: Lazy<ProjectDirs> = Lazy::new(|| {
    ProjectDirs::from("", "Hollow Collective", env!("CARGO_PKG_NAME")).unwrap()
});
