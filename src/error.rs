//! Error types for update-policy operations.
//!
//! This module defines [`UpdateError`], the primary error type used throughout
//! the engine, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Fatal conditions (no manifest reachable, unparseable current version)
//!   propagate to the caller as errors
//! - Recoverable conditions (missing checksum, unreachable min-version source
//!   on a non-forced check) are absorbed by the evaluator and degrade the
//!   result instead of failing it
//! - [`UpdateError::ChecksumNotFound`] is a distinct variant from fetch
//!   failures so candidate iteration can branch on it directly

use thiserror::Error;

/// Core error type for update-policy operations.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The manifest candidate list was empty.
    #[error("no manifest URL candidates")]
    NoManifestCandidates,

    /// Request-level failure: connect, TLS, or timeout.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    /// Server responded with a non-success status.
    #[error("unexpected status {status} from {url}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// The caller-supplied deadline expired before a request could be issued.
    #[error("deadline exceeded before fetching {url}")]
    DeadlineExceeded { url: String },

    /// Response body did not decode as the expected JSON shape.
    #[error("decode {what} from {url}: {source}")]
    Decode {
        what: &'static str,
        url: String,
        source: serde_json::Error,
    },

    /// Manifest fetched successfully but carries no version.
    #[error("manifest from {url} missing version")]
    ManifestMissingVersion { url: String },

    /// Minimum-version payload fetched successfully but carries no version.
    #[error("min version payload from {url} missing version")]
    MinVersionMissing { url: String },

    /// A checksum listing was fetched but does not mention the target
    /// artifact. Candidate iteration continues past this.
    #[error("checksum not found: {target}")]
    ChecksumNotFound { target: String },

    /// Every checksum candidate was exhausted without a match. `last_url`
    /// keeps the last candidate that failed to fetch, for diagnostics.
    #[error("unable to locate checksum for {target}")]
    ChecksumUnavailable {
        target: String,
        last_url: Option<String>,
    },

    /// A version string that does not parse as a semantic version.
    #[error("invalid version '{version}': {source}")]
    VersionParse {
        version: String,
        source: semver::Error,
    },

    /// Neither a platform cache directory nor a home directory is available.
    #[error("unable to determine a cache directory")]
    CacheDirUnavailable,

    /// The home directory is not resolvable (marker file storage).
    #[error("unable to determine the home directory")]
    HomeDirUnavailable,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization wrapper for cache payloads.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for update-policy operations.
pub type Result<T> = std::result::Result<T, UpdateError>;
