//! Optional-update attempt marker.
//!
//! A single timestamp remembering when an optional (non-forced) update was
//! last attempted, kept apart from the metadata cache so clearing one never
//! disturbs the other. Callers use it to throttle how often the tool nags
//! about optional upgrades.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, UpdateError};

/// Minimum interval between optional update attempts, in seconds (1 day).
pub const OPTIONAL_UPDATE_TTL_SECS: i64 = 86_400;

const MARKER_DIR: &str = ".thunder";
const MARKER_SUBDIR: &str = "cache";
const MARKER_FILE: &str = "optional_update_status.json";

#[derive(Debug, Serialize, Deserialize)]
struct MarkerPayload {
    last_attempt: DateTime<Utc>,
}

/// Reads and records the last optional-update attempt.
pub struct AttemptMarker {
    path: PathBuf,
}

impl AttemptMarker {
    /// Marker at its well-known location under the home directory.
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or(UpdateError::HomeDirUnavailable)?;
        Ok(Self {
            path: home.join(MARKER_DIR).join(MARKER_SUBDIR).join(MARKER_FILE),
        })
    }

    /// Marker backed by an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp of the last recorded attempt; `None` when none has been
    /// recorded. Absence is not an error.
    pub fn read(&self) -> Result<Option<DateTime<Utc>>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let payload: MarkerPayload = serde_json::from_str(&data)?;
        Ok(Some(payload.last_attempt))
    }

    /// Record an attempt, overwriting any previous one. Stored in UTC.
    pub fn write(&self, at: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = MarkerPayload { last_attempt: at };
        let json = serde_json::to_string(&payload)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove the marker. Removing an absent marker is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Whether an optional attempt may run at `now`: true when nothing has
    /// been recorded, or the last attempt is at least a day old.
    pub fn due(&self, now: DateTime<Utc>) -> Result<bool> {
        match self.read()? {
            None => Ok(true),
            Some(last) => Ok((now - last).num_seconds() >= OPTIONAL_UPDATE_TTL_SECS),
        }
    }
}
