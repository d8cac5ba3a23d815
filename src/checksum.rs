//! Checksum listing parsing and resolution.
//!
//! Release checksums are published as plain-text listings, one entry per
//! line, hash first and filename last. The resolver walks the candidate URLs
//! in order and caches the first hash that matches the target artifact. A
//! listing that fetches fine but lacks the target is a clean miss, kept
//! distinct from fetch failures; both move iteration along to the next
//! candidate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{CacheStore, Timestamped};
use crate::error::{Result, UpdateError};
use crate::fetch::{first_success, Deadline, Fetcher};

/// Cache filename for a `(version, os)` checksum entry.
pub fn checksum_cache_name(version: &str, os: &str) -> String {
    format!("checksums_{version}_{os}.json")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedChecksum {
    checksum: String,
    url: String,
}

/// Extract the hash for `target` from a checksum listing.
///
/// Lines are split on whitespace; the last token is the filename and the
/// first is the hash. Filenames match exactly or as a `/`- or `\`-separated
/// path suffix. Lines with fewer than two tokens are skipped. A listing
/// without the target yields [`UpdateError::ChecksumNotFound`].
pub fn parse_listing(data: &str, target: &str) -> Result<String> {
    let target = target.trim();
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }
        let name = parts[parts.len() - 1];
        if name == target
            || name.ends_with(&format!("/{target}"))
            || name.ends_with(&format!("\\{target}"))
        {
            return Ok(parts[0].to_string());
        }
    }
    Err(UpdateError::ChecksumNotFound {
        target: target.to_string(),
    })
}

/// Resolve the expected hash for the target artifact, returning it together
/// with the URL that supplied it.
///
/// Cache-first keyed by `(version, os)` unless forced. On exhaustion the
/// error carries the last candidate that failed to fetch (clean misses are
/// not remembered).
#[allow(clippy::too_many_arguments)]
pub(crate) fn fetch(
    fetcher: &Fetcher,
    store: &CacheStore,
    version: &str,
    os: &str,
    target: &str,
    candidates: &[String],
    force: bool,
    deadline: Deadline,
) -> Result<(String, String)> {
    let cache_name = checksum_cache_name(version, os);
    if !force {
        if let Some(entry) = store.read::<Timestamped<CachedChecksum>>(&cache_name) {
            if entry.is_fresh() {
                return Ok((entry.payload.checksum, entry.payload.url));
            }
        }
    }

    let usable: Vec<&str> = candidates
        .iter()
        .map(String::as_str)
        .filter(|c| !c.is_empty())
        .collect();

    let mut last_failed_url = None;
    let outcome = first_success(usable, |url| {
        let attempt = fetch_from_url(fetcher, url, target, deadline);
        if let Err(err) = &attempt {
            if !matches!(err, UpdateError::ChecksumNotFound { .. }) {
                last_failed_url = Some(url.to_string());
            }
        }
        attempt
    });

    match outcome {
        Ok((url, checksum)) => {
            let entry = Timestamped::now(CachedChecksum {
                checksum: checksum.clone(),
                url: url.to_string(),
            });
            if let Err(err) = store.write(&cache_name, &entry) {
                debug!("checksum: cache write failed: {}", err);
            }
            Ok((checksum, url.to_string()))
        }
        Err(_) => Err(UpdateError::ChecksumUnavailable {
            target: target.to_string(),
            last_url: last_failed_url,
        }),
    }
}

fn fetch_from_url(fetcher: &Fetcher, url: &str, target: &str, deadline: Deadline) -> Result<String> {
    let body = fetcher.get_text(url, deadline)?;
    parse_listing(&body, target)
}
