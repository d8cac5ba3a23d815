//! On-disk caching for update metadata.
//!
//! This module provides the freshness-agnostic JSON store shared by the
//! manifest, minimum-version, and checksum resolvers, plus the
//! optional-update attempt marker kept separately under the user's home
//! directory.

pub mod marker;
pub mod store;

pub use marker::{AttemptMarker, OPTIONAL_UPDATE_TTL_SECS};
pub use store::{CacheStore, Timestamped, CACHE_TTL_SECS};

use std::path::PathBuf;

use crate::error::{Result, UpdateError};

/// Subdirectory of the platform cache directory holding engine metadata.
pub const CACHE_DIR_NAME: &str = "tnr";

/// Resolve the default cache directory: the platform cache directory,
/// falling back to `~/.cache`, plus the engine subdirectory.
pub fn default_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
        .map(|base| base.join(CACHE_DIR_NAME))
        .ok_or(UpdateError::CacheDirUnavailable)
}
