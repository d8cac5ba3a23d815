//! Minimum supported version resolution.
//!
//! Enforcement is opt-in: without a configured endpoint no network traffic
//! happens and callers fall back to their own default. The fetched value is
//! cached alongside the manifest so repeat checks inside the freshness
//! window stay offline.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{CacheStore, Timestamped};
use crate::config::UpdateConfig;
use crate::error::{Result, UpdateError};
use crate::fetch::{Deadline, Fetcher};

/// Cache filename for the minimum supported version.
pub const MIN_VERSION_CACHE: &str = "min_version.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedMinVersion {
    version: String,
}

#[derive(Debug, Deserialize)]
struct MinVersionPayload {
    #[serde(default)]
    version: String,
}

/// Fetch the minimum supported version, if an endpoint is configured.
///
/// `Ok(None)` means enforcement is disabled. Cache-first unless `force`;
/// a fresh fetch is persisted best-effort.
pub(crate) fn fetch_min_version(
    fetcher: &Fetcher,
    store: &CacheStore,
    config: &UpdateConfig,
    force: bool,
    deadline: Deadline,
) -> Result<Option<String>> {
    let url = match config
        .min_version_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
    {
        Some(url) => url,
        None => return Ok(None),
    };

    if !force {
        if let Some(entry) = store.read::<Timestamped<CachedMinVersion>>(MIN_VERSION_CACHE) {
            if entry.is_fresh() {
                debug!("min-version: using cached {}", entry.payload.version);
                return Ok(Some(entry.payload.version));
            }
        }
    }

    let payload: MinVersionPayload = fetcher.get_json("minimum version", url, deadline)?;
    let version = payload.version.trim().to_string();
    if version.is_empty() {
        return Err(UpdateError::MinVersionMissing {
            url: url.to_string(),
        });
    }

    let entry = Timestamped::now(CachedMinVersion {
        version: version.clone(),
    });
    if let Err(err) = store.write(MIN_VERSION_CACHE, &entry) {
        debug!("min-version: cache write failed: {}", err);
    }
    debug!("min-version: fetched {} from {}", version, url);

    Ok(Some(version))
}
