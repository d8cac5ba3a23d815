//! Release manifest type and resolver.
//!
//! The manifest is the single source of truth for the latest published
//! version. It is fetched from an ordered candidate list (override URL,
//! download base, built-in bases) where the first URL answering HTTP 200
//! with a usable body wins outright; there is no merging across sources.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{CacheStore, Timestamped};
use crate::config::UpdateConfig;
use crate::error::{Result, UpdateError};
use crate::fetch::{first_success, Deadline, Fetcher};
use crate::platform::Platform;

/// Cache filename for the latest-manifest entry.
pub const MANIFEST_CACHE: &str = "latest_manifest.json";

/// Published release metadata.
///
/// `assets` maps `"<os>/<arch>"` keys to asset URLs and the special key
/// `"checksums"` to an explicit checksum listing. Both are optional;
/// derived and fallback URLs fill whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub assets: HashMap<String, String>,
}

impl Manifest {
    /// Explicit asset URL for a platform, if the manifest carries one.
    pub fn asset_for(&self, platform: &Platform) -> Option<&str> {
        self.assets
            .get(&format!("{}/{}", platform.os, platform.arch))
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    /// Explicit checksum listing URL, if the manifest carries one.
    pub fn checksums_url(&self) -> Option<&str> {
        self.assets
            .get("checksums")
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedManifest {
    manifest: Manifest,
}

/// Fetch the latest release manifest.
///
/// Cache-first unless forced. Candidates are tried in order; the first that
/// returns a manifest with a non-empty version wins and is persisted
/// best-effort (a cache-write failure never fails the fetch). Exhausting
/// every candidate surfaces the last error.
pub(crate) fn fetch_latest(
    fetcher: &Fetcher,
    store: &CacheStore,
    config: &UpdateConfig,
    force: bool,
    deadline: Deadline,
) -> Result<Manifest> {
    if !force {
        if let Some(entry) = store.read::<Timestamped<CachedManifest>>(MANIFEST_CACHE) {
            if entry.is_fresh() {
                debug!(
                    "manifest: using cached latest manifest version={}",
                    entry.payload.manifest.version
                );
                return Ok(entry.payload.manifest);
            }
        }
    }

    let candidates = config.manifest_candidates();
    match first_success(candidates, |url| {
        debug!("manifest: trying {}", url);
        fetch_from_url(fetcher, url, deadline)
    }) {
        Ok((url, manifest)) => {
            let entry = Timestamped::now(CachedManifest {
                manifest: manifest.clone(),
            });
            if let Err(err) = store.write(MANIFEST_CACHE, &entry) {
                debug!("manifest: cache write failed: {}", err);
            }
            debug!("manifest: using {} (version={})", url, manifest.version);
            Ok(manifest)
        }
        Err(Some(last)) => Err(last),
        Err(None) => Err(UpdateError::NoManifestCandidates),
    }
}

fn fetch_from_url(fetcher: &Fetcher, url: &str, deadline: Deadline) -> Result<Manifest> {
    let manifest: Manifest = fetcher.get_json("manifest", url, deadline)?;
    if manifest.version.is_empty() {
        return Err(UpdateError::ManifestMissingVersion {
            url: url.to_string(),
        });
    }
    Ok(manifest)
}
