//! Host platform detection.
//!
//! Maps the running host onto the three canonical identifiers used in every
//! derived URL and artifact filename: OS name, architecture name, and archive
//! extension. Detection never fails; unrecognized hosts pass through and fail
//! later, at fetch time, with a useful URL in hand.

use std::env::consts;

use crate::version;

/// Canonical platform identifiers for release artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Release OS name: `macos`, `linux`, `windows`, or a passthrough.
    pub os: String,
    /// Release architecture name: `amd64`, `arm64`, or a passthrough.
    pub arch: String,
    /// Archive extension including the leading dot.
    pub ext: String,
}

impl Platform {
    /// Detect the current host.
    pub fn detect() -> Self {
        Self::from_host(consts::OS, consts::ARCH)
    }

    /// Map raw host identifiers onto release identifiers.
    pub fn from_host(os: &str, arch: &str) -> Self {
        let (os, ext) = match os {
            "macos" => ("macos", ".tar.gz"),
            "linux" => ("linux", ".tar.gz"),
            "windows" => ("windows", ".zip"),
            other => (other, ".tar.gz"),
        };
        let arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            other => other,
        };
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
            ext: ext.to_string(),
        }
    }

    /// OS name as it appears in artifact filenames. Asset names historically
    /// use the kernel name, so `macos` becomes `darwin`.
    pub fn file_os(&self) -> &str {
        if self.os == "macos" {
            "darwin"
        } else {
            &self.os
        }
    }

    /// Deterministic artifact filename for a release version:
    /// `tnr_<version>_<fileOS>_<arch><ext>`.
    pub fn archive_name(&self, version: &str) -> String {
        format!(
            "tnr_{}_{}_{}{}",
            version::normalize(version),
            self.file_os(),
            self.arch,
            self.ext
        )
    }
}
