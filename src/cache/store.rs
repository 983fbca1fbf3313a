//! Durable key-value store for cached API responses
//!
//! Each key maps to one JSON file in an XDG-compliant cache directory.
//! There is no expiry metadata and no explicit flush step: a write is
//! durable once it returns, and a later process observes the last written
//! value.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persists serializable values to disk, one JSON file per key
///
/// Values are stored in an XDG-compliant cache directory
/// (`~/.cache/manzanita/` on Linux). A write replaces the whole stored
/// value; partial updates are not possible.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheStore {
    /// Creates a new CacheStore using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "manzanita")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheStore with a custom cache directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path to the cache file for the given key
    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Writes a value to the store, replacing any previous value wholesale
    ///
    /// # Arguments
    /// * `key` - Unique identifier for the entry (e.g., "predictions-v1")
    /// * `value` - The value to persist (must implement Serialize)
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation or file writing fails
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> std::io::Result<()> {
        self.ensure_dir()?;

        let json = serde_json::to_string_pretty(value)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.entry_path(key), json)
    }

    /// Reads a value from the store
    ///
    /// Returns `None` if the entry doesn't exist or cannot be parsed as `T`;
    /// a never-written key is indistinguishable from a corrupt one. This
    /// never fails: callers pair it with `unwrap_or_default()` to get an
    /// empty record.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let content = fs::read_to_string(self.entry_path(key)).ok()?;
        serde_json::from_str(&content).ok()
    }
}
