//! Engine configuration.
//!
//! All knobs the update engine reads from the environment live here, loaded
//! once into an [`UpdateConfig`]. The built-in download bases are injected at
//! construction rather than held in process-global state, so tests can point
//! a config at a mock server without touching the environment.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

/// Explicit manifest URL; replaces the entire candidate list.
pub const ENV_LATEST_URL: &str = "TNR_LATEST_URL";

/// Download base used for the manifest URL (absent an explicit override) and
/// for default asset URLs.
pub const ENV_DOWNLOAD_BASE: &str = "TNR_DOWNLOAD_BASE";

/// Minimum-version source; setting it enables mandatory-upgrade enforcement.
pub const ENV_MIN_VERSION_URL: &str = "TNR_MIN_VERSION_URL";

/// Overrides the metadata cache directory.
pub const ENV_CACHE_DIR: &str = "TNR_UPDATE_CACHE_DIR";

/// Kill switch: set to `1` to disable self-update checks entirely.
pub const ENV_NO_SELFUPDATE: &str = "TNR_NO_SELFUPDATE";

/// Set to `1` for verbose URL and hash diagnostics on stderr.
pub const ENV_UPDATE_DEBUG: &str = "TNR_UPDATE_DEBUG";

/// Built-in download bases, tried in order after any override.
pub const DEFAULT_BASES: &[&str] = &["https://gettnr.com"];

/// Well-known manifest path relative to a download base.
pub const LATEST_MANIFEST_PATH: &str = "/tnr/releases/latest.json";

/// GitHub release download base for the fallback URLs.
pub const GITHUB_RELEASE_BASE: &str =
    "https://github.com/Thunder-Compute/thunder-cli/releases/download";

/// Source and cache configuration for a policy check.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Explicit manifest URL override.
    pub latest_url: Option<String>,
    /// Download-base override.
    pub download_base: Option<String>,
    /// Minimum-version URL; `None` disables mandatory enforcement.
    pub min_version_url: Option<String>,
    /// Metadata cache directory override.
    pub cache_dir: Option<PathBuf>,
    /// Built-in bases consulted after any override.
    pub default_bases: Vec<String>,
    /// Base for GitHub release fallback URLs; empty disables the fallback.
    pub github_base: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            latest_url: None,
            download_base: None,
            min_version_url: None,
            cache_dir: None,
            default_bases: DEFAULT_BASES.iter().map(|s| s.to_string()).collect(),
            github_base: GITHUB_RELEASE_BASE.to_string(),
        }
    }
}

impl UpdateConfig {
    /// Build a config from the `TNR_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            latest_url: env_value(ENV_LATEST_URL),
            download_base: env_value(ENV_DOWNLOAD_BASE),
            min_version_url: env_value(ENV_MIN_VERSION_URL),
            cache_dir: env_value(ENV_CACHE_DIR).map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Replace the built-in base list.
    pub fn with_default_bases<I, S>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_bases = bases.into_iter().map(Into::into).collect();
        self
    }

    /// Ordered, de-duplicated manifest URL candidates.
    ///
    /// An explicit manifest URL takes the first slot; otherwise a configured
    /// download base contributes `<base>/tnr/releases/latest.json`. The
    /// built-in bases follow either way.
    pub fn manifest_candidates(&self) -> Vec<String> {
        let mut urls = Vec::new();
        if let Some(latest) = self.latest_url.as_deref().map(str::trim) {
            if !latest.is_empty() {
                urls.push(latest.to_string());
            }
        }
        if urls.is_empty() {
            if let Some(base) = trimmed_base(self.download_base.as_deref()) {
                urls.push(format!("{base}{LATEST_MANIFEST_PATH}"));
            }
        }
        for base in &self.default_bases {
            let base = base.trim_end_matches('/');
            if !base.is_empty() {
                urls.push(format!("{base}{LATEST_MANIFEST_PATH}"));
            }
        }
        dedupe(urls)
    }

    /// Base used to construct default release asset URLs: the download-base
    /// override if set, else the first non-empty built-in base.
    pub fn release_base(&self) -> Option<String> {
        if let Some(base) = trimmed_base(self.download_base.as_deref()) {
            return Some(base.to_string());
        }
        self.default_bases
            .iter()
            .map(|b| b.trim_end_matches('/'))
            .find(|b| !b.is_empty())
            .map(|b| b.to_string())
    }

    /// Whether minimum-version enforcement is configured.
    pub fn min_version_enabled(&self) -> bool {
        self.min_version_url
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty())
    }
}

/// Read an environment variable, treating blank values as unset.
fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn trimmed_base(base: Option<&str>) -> Option<&str> {
    base.map(|b| b.trim().trim_end_matches('/'))
        .filter(|b| !b.is_empty())
}

/// Drop empty entries and repeats, preserving first-seen order.
fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}
