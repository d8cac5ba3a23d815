//! tnr-update - Update policy engine for the tnr CLI.
//!
//! Decides whether an installed tnr binary should update. A check resolves
//! the latest release and the artifact and checksum URLs for this platform,
//! then compares versions to flag the update as optional or mandatory. All
//! metadata sits behind a 24-hour cache so repeat checks stay off the
//! network.
//!
//! # Modules
//!
//! - [`cache`] - Cached release metadata and the optional-update marker
//! - [`checksum`] - Checksum listing parsing and resolution
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Release source configuration and environment overrides
//! - [`error`] - Error types and result aliases
//! - [`fetch`] - HTTP fetching with deadlines
//! - [`install`] - Install-method detection (Homebrew, Scoop, winget)
//! - [`manifest`] - Latest-release manifest resolution
//! - [`minversion`] - Minimum supported version resolution
//! - [`platform`] - Host platform detection and artifact naming
//! - [`policy`] - The update decision itself
//! - [`release`] - Asset and checksum URL derivation
//! - [`version`] - Version string normalization and display
//!
//! # Example
//!
//! ```no_run
//! use tnr_update::{PolicyChecker, UpdateConfig};
//!
//! let checker = PolicyChecker::new(UpdateConfig::default())?;
//! let result = checker.check("1.2.3", false)?;
//! if result.mandatory {
//!     eprintln!("update required: minimum supported is {}", result.min_version);
//! }
//! # Ok::<(), tnr_update::UpdateError>(())
//! ```

pub mod cache;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod install;
pub mod manifest;
pub mod minversion;
pub mod platform;
pub mod policy;
pub mod release;
pub mod version;

pub use cache::{AttemptMarker, CacheStore};
pub use config::UpdateConfig;
pub use error::{Result, UpdateError};
pub use install::InstallMethod;
pub use manifest::Manifest;
pub use platform::Platform;
pub use policy::{PolicyChecker, PolicyResult};
pub use release::ReleaseLocation;
