//! Install-method detection.
//!
//! Package-manager installs (Homebrew, Scoop, winget) are recognized from
//! the resolved binary path so callers can route users to the manager's own
//! upgrade command instead of a raw download.

use std::fmt;
use std::path::Path;

/// How the running binary was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    Homebrew,
    Scoop,
    Winget,
    Manual,
}

impl InstallMethod {
    /// Classify a binary path. Matching is case-insensitive.
    pub fn detect_for_path(path: &Path) -> Self {
        let p = path.to_string_lossy().to_lowercase();
        if p.contains("/opt/homebrew/") || p.contains("/usr/local/cellar/") {
            return Self::Homebrew;
        }
        if p.contains("\\scoop\\apps\\") {
            return Self::Scoop;
        }
        if p.contains("windowsapps") {
            return Self::Winget;
        }
        Self::Manual
    }

    /// Classify the running binary, following symlinks. Any failure to
    /// resolve the path reads as a manual install.
    pub fn detect() -> Self {
        match std::env::current_exe() {
            Ok(exe) => {
                let resolved = exe.canonicalize().unwrap_or(exe);
                Self::detect_for_path(&resolved)
            }
            Err(_) => Self::Manual,
        }
    }

    pub fn is_package_managed(&self) -> bool {
        !matches!(self, Self::Manual)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Homebrew => "Homebrew",
            Self::Scoop => "Scoop",
            Self::Winget => "Windows Package Manager",
            Self::Manual => "manual install",
        }
    }

    /// The package manager's own upgrade command, when one applies.
    pub fn upgrade_command(&self) -> Option<&'static str> {
        match self {
            Self::Homebrew => Some("brew update && brew upgrade tnr"),
            Self::Scoop => Some("scoop update tnr"),
            Self::Winget => Some("winget upgrade Thunder.tnr"),
            Self::Manual => None,
        }
    }
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
