//! Version string handling.
//!
//! Published versions arrive with or without a `v` prefix depending on the
//! source (manifest, tag, checksum filename). Everything internal works on
//! the normalized bare form; the prefixed form only reappears in release tags
//! and user-facing messages.

use crate::error::{Result, UpdateError};

/// Strip surrounding whitespace and a single leading `v`/`V`.
pub fn normalize(version: &str) -> String {
    let v = version.trim();
    let v = v
        .strip_prefix('v')
        .or_else(|| v.strip_prefix('V'))
        .unwrap_or(v);
    v.to_string()
}

/// Parse a normalized version string as a semantic version.
pub fn parse(version: &str) -> Result<semver::Version> {
    semver::Version::parse(version).map_err(|source| UpdateError::VersionParse {
        version: version.to_string(),
        source,
    })
}

/// Ensure a non-empty version or tag carries a `v` prefix.
pub fn tagged(version: &str) -> String {
    let v = version.trim();
    if v.is_empty() || v.starts_with('v') || v.starts_with('V') {
        v.to_string()
    } else {
        format!("v{v}")
    }
}

/// Render a version for messages: `v`-prefixed, `unknown` when empty.
pub fn display(version: &str) -> String {
    let v = version.trim();
    if v.is_empty() {
        "unknown".to_string()
    } else {
        tagged(v)
    }
}
