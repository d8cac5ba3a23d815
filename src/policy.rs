//! Update policy evaluation.
//!
//! [`PolicyChecker::check`] turns the remote release state into a single
//! [`PolicyResult`] describing the latest release, the artifact for this
//! platform, and whether the running binary must or may upgrade.
//! Development builds are exempt before any network traffic. A missing
//! checksum degrades the result instead of failing it; a missing minimum
//! version is fatal only for forced checks.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{self, CacheStore};
use crate::checksum;
use crate::config::UpdateConfig;
use crate::error::Result;
use crate::fetch::{Deadline, Fetcher};
use crate::manifest;
use crate::minversion;
use crate::platform::Platform;
use crate::release;
use crate::version;

/// Outcome of an update check. String fields are empty when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyResult {
    /// Normalized version of the running binary.
    pub current_version: String,
    /// Normalized latest released version.
    pub latest_version: String,
    /// Latest version exactly as published, tag prefix and all.
    pub latest_tag: String,
    /// Normalized minimum supported version, empty when unenforced.
    pub min_version: String,
    /// The running binary is below the supported floor.
    pub mandatory: bool,
    /// A newer release exists.
    pub optional: bool,
    /// Why an update is flagged: `min-version` or `new-version`.
    pub reason: String,
    /// Download URL for this platform's artifact.
    pub asset_url: String,
    /// URL the expected checksum was read from.
    pub checksum_url: String,
    /// Expected SHA-256 of the artifact, empty when unavailable.
    pub expected_sha256: String,
}

impl PolicyResult {
    /// Release tag for download URLs and display: the published tag when
    /// present, else the normalized version, always `v`-prefixed.
    pub fn release_tag(&self) -> String {
        let tag = self.latest_tag.trim();
        if !tag.is_empty() {
            return version::tagged(tag);
        }
        version::tagged(&self.latest_version)
    }

    /// Whether any update, mandatory or optional, is on offer.
    pub fn update_available(&self) -> bool {
        self.mandatory || self.optional
    }
}

/// Evaluates update policy against a configured set of release sources.
pub struct PolicyChecker {
    config: UpdateConfig,
    store: CacheStore,
    fetcher: Fetcher,
    platform: Platform,
}

impl PolicyChecker {
    /// Build a checker for the given configuration. Fails only when no
    /// usable cache directory can be determined.
    pub fn new(config: UpdateConfig) -> Result<Self> {
        let root = match config.cache_dir.clone() {
            Some(dir) => dir,
            None => cache::default_cache_dir()?,
        };
        Ok(Self {
            config,
            store: CacheStore::new(root),
            fetcher: Fetcher::new(),
            platform: Platform::detect(),
        })
    }

    /// Build a checker from the `TNR_*` environment.
    pub fn from_env() -> Result<Self> {
        Self::new(UpdateConfig::from_env())
    }

    /// Evaluate for a platform other than the host. Mainly for tests and
    /// cross-platform tooling.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Run an update check with no overall deadline.
    pub fn check(&self, current_version: &str, force: bool) -> Result<PolicyResult> {
        self.check_with_deadline(current_version, force, Deadline::none())
    }

    /// Run an update check.
    ///
    /// `force` bypasses every cache and promotes minimum-version fetch
    /// failures to errors. The deadline bounds each network request by the
    /// time remaining.
    pub fn check_with_deadline(
        &self,
        current_version: &str,
        force: bool,
        deadline: Deadline,
    ) -> Result<PolicyResult> {
        let current = version::normalize(current_version);
        let mut result = PolicyResult {
            current_version: current.clone(),
            ..PolicyResult::default()
        };
        if current.is_empty() || current.eq_ignore_ascii_case("dev") {
            debug!("policy: skipping check for development build");
            return Ok(result);
        }

        let manifest =
            manifest::fetch_latest(&self.fetcher, &self.store, &self.config, force, deadline)?;
        result.latest_tag = manifest.version.trim().to_string();
        result.latest_version = version::normalize(&manifest.version);

        let location = release::locate(&manifest, &self.platform, &self.config);
        result.asset_url = location.asset_url;
        debug!("policy: asset {}", result.asset_url);

        let target = self.platform.archive_name(&manifest.version);
        match checksum::fetch(
            &self.fetcher,
            &self.store,
            &manifest.version,
            &self.platform.os,
            &target,
            &location.checksum_candidates,
            force,
            deadline,
        ) {
            Ok((sum, used_url)) => {
                debug!("policy: checksums {} (sha256={})", used_url, sum);
                result.checksum_url = used_url;
                result.expected_sha256 = sum;
            }
            Err(err) => debug!("policy: checksum unavailable: {}", err),
        }

        match minversion::fetch_min_version(&self.fetcher, &self.store, &self.config, force, deadline)
        {
            Ok(Some(min)) => result.min_version = version::normalize(&min),
            Ok(None) => {
                result.min_version = result.latest_version.clone();
                debug!(
                    "policy: min version defaulting to latest {}",
                    result.min_version
                );
            }
            Err(err) if force => return Err(err),
            Err(err) => debug!("policy: min version unavailable: {}", err),
        }

        let current_v = version::parse(&current)?;

        if !result.min_version.is_empty() {
            if let Ok(min_v) = version::parse(&result.min_version) {
                if current_v < min_v {
                    result.mandatory = true;
                    result.reason = "min-version".to_string();
                    return Ok(result);
                }
            }
        }

        if !result.latest_version.is_empty() {
            if let Ok(latest_v) = version::parse(&result.latest_version) {
                if current_v < latest_v {
                    result.optional = true;
                    result.reason = "new-version".to_string();
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn offline_checker(temp: &TempDir) -> PolicyChecker {
        // No candidate sources: any network attempt would fail loudly.
        let config = UpdateConfig {
            cache_dir: Some(temp.path().to_path_buf()),
            ..UpdateConfig::default()
        }
        .with_default_bases(Vec::<String>::new());
        PolicyChecker::new(config).unwrap()
    }

    #[test]
    fn dev_builds_are_exempt() {
        let temp = TempDir::new().unwrap();
        let checker = offline_checker(&temp);

        for raw in ["dev", "DEV", "Dev"] {
            let result = checker.check(raw, false).unwrap();
            assert_eq!(result.current_version, raw);
            assert!(!result.update_available());
            assert!(result.reason.is_empty());
        }
    }

    #[test]
    fn blank_versions_are_exempt() {
        let temp = TempDir::new().unwrap();
        let checker = offline_checker(&temp);

        for raw in ["", "   ", "v", "V"] {
            let result = checker.check(raw, true).unwrap();
            assert_eq!(result.current_version, "");
            assert!(!result.update_available());
        }
    }

    #[test]
    fn release_tag_prefers_the_published_tag() {
        let result = PolicyResult {
            latest_tag: "v1.2.3".into(),
            latest_version: "1.2.3".into(),
            ..PolicyResult::default()
        };
        assert_eq!(result.release_tag(), "v1.2.3");
    }

    #[test]
    fn release_tag_falls_back_to_the_version() {
        let result = PolicyResult {
            latest_version: "1.2.3".into(),
            ..PolicyResult::default()
        };
        assert_eq!(result.release_tag(), "v1.2.3");

        let empty = PolicyResult::default();
        assert_eq!(empty.release_tag(), "");
    }

    #[test]
    fn update_available_covers_both_kinds() {
        let mut result = PolicyResult::default();
        assert!(!result.update_available());
        result.optional = true;
        assert!(result.update_available());
        result.optional = false;
        result.mandatory = true;
        assert!(result.update_available());
    }

    #[test]
    fn results_serialize_with_stable_keys() {
        let result = PolicyResult {
            current_version: "1.0.0".into(),
            latest_version: "1.1.0".into(),
            optional: true,
            reason: "new-version".into(),
            ..PolicyResult::default()
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["current_version"], "1.0.0");
        assert_eq!(value["latest_version"], "1.1.0");
        assert_eq!(value["optional"], true);
        assert_eq!(value["mandatory"], false);
        assert_eq!(value["reason"], "new-version");
    }
}
