//! Asset and checksum URL construction.
//!
//! Works out where a release's binary archive and checksum listing live.
//! Explicit manifest entries win; otherwise URLs are derived from the
//! download base using the published layout, with GitHub release URLs as the
//! final fallback. Checksum candidates are an ordered sequence that may
//! repeat entries; the resolver tries them one by one.

use url::Url;

use crate::config::UpdateConfig;
use crate::manifest::Manifest;
use crate::platform::Platform;
use crate::version;

/// Resolved asset URL plus the checksum listing candidates for one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseLocation {
    pub asset_url: String,
    pub checksum_candidates: Vec<String>,
}

/// Determine the asset URL and checksum candidates for a manifest and
/// platform. Pure; performs no I/O.
pub fn locate(manifest: &Manifest, platform: &Platform, config: &UpdateConfig) -> ReleaseLocation {
    let mut asset_url = manifest.asset_for(platform).map(str::to_string);
    let mut checksum_url = manifest.checksums_url().map(str::to_string);

    if asset_url.is_none() {
        asset_url = default_asset_url(manifest, platform, config);
    }
    if checksum_url.is_none() {
        checksum_url = asset_url.as_deref().and_then(|a| default_checksum_url(a, platform));
    }

    let github_base = config.github_base.trim_end_matches('/');

    // GitHub fallback for whichever of the two is still missing.
    if asset_url.is_none() || checksum_url.is_none() {
        let (gh_asset, gh_checksum) =
            github_asset_and_checksum(&manifest.version, platform, github_base);
        if asset_url.is_none() && !gh_asset.is_empty() {
            asset_url = Some(gh_asset);
        }
        if checksum_url.is_none() && !gh_checksum.is_empty() {
            checksum_url = Some(gh_checksum);
        }
    }

    let asset_url = asset_url.unwrap_or_default();
    let mut candidates = checksum_candidates(checksum_url.as_deref(), &asset_url, &platform.os);

    // The GitHub OS-specific listing always closes the candidate list.
    let (_, gh_checksum) = github_asset_and_checksum(&manifest.version, platform, github_base);
    if !gh_checksum.is_empty() {
        candidates.push(gh_checksum);
    }

    ReleaseLocation {
        asset_url,
        checksum_candidates: candidates,
    }
}

/// Checksum listing candidates: the explicit URL first, then the release-root
/// derivations `checksums-<os>.txt`, `checksums.txt`, `<os>/checksums-<os>.txt`.
pub fn checksum_candidates(explicit_url: Option<&str>, asset_url: &str, os: &str) -> Vec<String> {
    let mut candidates = Vec::with_capacity(4);
    if let Some(explicit) = explicit_url.filter(|u| !u.is_empty()) {
        candidates.push(explicit.to_string());
    }
    if let Some(root) = derive_release_root(asset_url) {
        candidates.push(format!("{root}/checksums-{os}.txt"));
        candidates.push(format!("{root}/checksums.txt"));
        candidates.push(format!("{root}/{os}/checksums-{os}.txt"));
    }
    candidates
}

/// Release root shared by an asset and its checksum listing: the asset URL
/// minus its last two path segments (`.../<os>/<artifact>`), without a
/// trailing slash. Unparseable URLs derive nothing.
pub fn derive_release_root(asset_url: &str) -> Option<String> {
    if asset_url.is_empty() {
        return None;
    }
    let mut url = Url::parse(asset_url).ok()?;
    url.path_segments_mut().ok()?.pop().pop();
    let root = url.to_string();
    Some(root.trim_end_matches('/').to_string())
}

/// Default asset URL from the configured download base:
/// `<base>/tnr/releases/<version>/<os>/<artifact>`.
pub fn default_asset_url(
    manifest: &Manifest,
    platform: &Platform,
    config: &UpdateConfig,
) -> Option<String> {
    if platform.os.is_empty() || platform.arch.is_empty() || manifest.version.is_empty() {
        return None;
    }
    let base = config.release_base()?;
    let ver = version::normalize(&manifest.version);
    Some(format!(
        "{}/tnr/releases/{}/{}/{}",
        base,
        ver,
        platform.os,
        platform.archive_name(&ver)
    ))
}

/// Default checksum URL next to an asset: `<release root>/checksums-<os>.txt`.
pub fn default_checksum_url(asset_url: &str, platform: &Platform) -> Option<String> {
    let root = derive_release_root(asset_url)?;
    Some(format!("{root}/checksums-{}.txt", platform.os))
}

/// GitHub release URLs for the asset and the OS-specific checksum listing.
/// The tag is `v<version>`; filenames use the bare version. An empty base
/// disables the fallback and yields empty URLs.
pub fn github_asset_and_checksum(
    raw_version: &str,
    platform: &Platform,
    base: &str,
) -> (String, String) {
    if base.is_empty() {
        return (String::new(), String::new());
    }
    let ver = version::normalize(raw_version);
    let tag = version::tagged(&ver);
    let asset_url = format!("{}/{}/{}", base, tag, platform.archive_name(&ver));
    let checksum_name = match platform.os.as_str() {
        "macos" => "checksums-macos.txt",
        "linux" => "checksums-linux.txt",
        "windows" => "checksums-windows.txt",
        _ => "checksums.txt",
    };
    let checksum_url = format!("{base}/{tag}/{checksum_name}");
    (asset_url, checksum_url)
}
