//! Cache storage implementation.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How long a metadata cache entry stays fresh, in seconds (1 day).
pub const CACHE_TTL_SECS: i64 = 86_400;

/// A cache payload together with the instant it was last checked.
///
/// Freshness is a caller concern: [`CacheStore::read`] hands back whatever is
/// on disk and each resolver applies [`Timestamped::is_fresh`] itself, so one
/// store serves entry kinds with different lifetimes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timestamped<T> {
    pub checked_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Timestamped<T> {
    /// Wrap a payload, stamped with the current time.
    pub fn now(payload: T) -> Self {
        Self {
            checked_at: Utc::now(),
            payload,
        }
    }

    /// Wrap a payload with an explicit timestamp.
    pub fn at(checked_at: DateTime<Utc>, payload: T) -> Self {
        Self {
            checked_at,
            payload,
        }
    }

    /// Whether the entry is still inside the TTL window.
    pub fn is_fresh(&self) -> bool {
        (Utc::now() - self.checked_at).num_seconds() <= CACHE_TTL_SECS
    }
}

/// JSON file store for update metadata.
///
/// Files are read and written without locking or atomic rename; concurrent
/// invocations may interleave, and the last writer wins. A torn or stale
/// read decodes as absent and triggers a refetch, so the race costs at most
/// one redundant network call.
pub struct CacheStore {
    /// Root directory for cache files.
    root: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Ensure the cache directory exists.
    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Read a payload by filename. A missing, unreadable, or undecodable
    /// file reads as absent.
    pub fn read<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let data = fs::read_to_string(self.path_for(name)).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Write a payload by filename, creating the cache directory as needed.
    pub fn write<T: Serialize>(&self, name: &str, payload: &T) -> Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(payload)?;
        fs::write(self.path_for(name), json)?;
        Ok(())
    }

    /// Remove a single cache file. Returns whether it existed.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let path = self.path_for(name);
        if path.exists() {
            fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Filenames of the JSON entries currently on disk, sorted.
    pub fn entries(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|e| e == "json") {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Remove every cache file. Returns how many were deleted.
    pub fn clear(&self) -> Result<usize> {
        let names = self.entries()?;
        let mut removed = 0;
        for name in names {
            if self.remove(&name)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        version: String,
    }

    #[test]
    fn cache_store_creation() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());

        assert_eq!(store.root(), temp.path());
    }

    #[test]
    fn write_and_read_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());

        let entry = Timestamped::now(Payload {
            version: "1.2.3".into(),
        });
        store.write("min_version.json", &entry).unwrap();

        let loaded: Timestamped<Payload> = store.read("min_version.json").unwrap();
        assert_eq!(loaded.payload.version, "1.2.3");
        assert_eq!(loaded.checked_at, entry.checked_at);
    }

    #[test]
    fn read_nonexistent_returns_none() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());

        let loaded: Option<Timestamped<Payload>> = store.read("missing.json");
        assert!(loaded.is_none());
    }

    #[test]
    fn corrupt_file_reads_as_absent() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());

        fs::create_dir_all(temp.path()).unwrap();
        fs::write(temp.path().join("broken.json"), "{not json").unwrap();

        let loaded: Option<Timestamped<Payload>> = store.read("broken.json");
        assert!(loaded.is_none());
    }

    #[test]
    fn write_creates_the_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("cache");
        let store = CacheStore::new(&root);

        let entry = Timestamped::now(Payload {
            version: "1.0.0".into(),
        });
        store.write("latest_manifest.json", &entry).unwrap();

        assert!(root.join("latest_manifest.json").exists());
    }

    #[test]
    fn payload_fields_are_flattened_beside_checked_at() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());

        let entry = Timestamped::now(Payload {
            version: "2.0.0".into(),
        });
        store.write("min_version.json", &entry).unwrap();

        let raw = fs::read_to_string(temp.path().join("min_version.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("checked_at").is_some());
        assert_eq!(value.get("version").unwrap(), "2.0.0");
    }

    #[test]
    fn fresh_entry_within_ttl() {
        let entry = Timestamped::now(Payload {
            version: "1.0.0".into(),
        });
        assert!(entry.is_fresh());
    }

    #[test]
    fn entry_older_than_ttl_is_stale() {
        let entry = Timestamped::at(
            Utc::now() - Duration::hours(25),
            Payload {
                version: "1.0.0".into(),
            },
        );
        assert!(!entry.is_fresh());
    }

    #[test]
    fn entry_just_inside_ttl_is_fresh() {
        let entry = Timestamped::at(
            Utc::now() - Duration::hours(23),
            Payload {
                version: "1.0.0".into(),
            },
        );
        assert!(entry.is_fresh());
    }

    #[test]
    fn remove_entry() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());

        let entry = Timestamped::now(Payload {
            version: "1.0.0".into(),
        });
        store.write("latest_manifest.json", &entry).unwrap();

        assert!(store.remove("latest_manifest.json").unwrap());
        assert!(!store.remove("latest_manifest.json").unwrap());
    }

    #[test]
    fn entries_lists_json_files_sorted() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());

        let entry = Timestamped::now(Payload {
            version: "1.0.0".into(),
        });
        store.write("min_version.json", &entry).unwrap();
        store.write("latest_manifest.json", &entry).unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(
            store.entries().unwrap(),
            vec![
                "latest_manifest.json".to_string(),
                "min_version.json".to_string()
            ]
        );
    }

    #[test]
    fn entries_on_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path().join("never-created"));

        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn clear_cache() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());

        let entry = Timestamped::now(Payload {
            version: "1.0.0".into(),
        });
        store.write("latest_manifest.json", &entry).unwrap();
        store.write("checksums_1.0.0_linux.json", &entry).unwrap();

        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.entries().unwrap().is_empty());
    }
}
