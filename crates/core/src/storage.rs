//! Persistent key-value storage.
//!
//! The intake client keeps exactly one persistent thing, its API configuration, in a
//! small string-to-string store. [`FileKeyValueStore`] keeps the whole store as one
//! JSON object on disk; [`MemoryKeyValueStore`] backs tests and throwaway sessions.
//!
//! Reads never fail: a missing or corrupt store reads as empty. Writes rewrite the
//! whole file and have no concurrency protection, which is fine for a single user
//! with a single session.

use crate::constants::STORAGE_FILENAME;
use crate::error::{IntakeError, IntakeResult};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// String-keyed persistent storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value for `key`, or `None` when absent or unreadable.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> IntakeResult<()>;
}

/// File-backed store holding every key in a single JSON object.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted in `config_dir`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            path: config_dir.as_ref().join(STORAGE_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(_) => return BTreeMap::new(),
        };

        match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("ignoring corrupt storage file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set_item(&self, key: &str, value: &str) -> IntakeResult<()> {
        let mut entries = self.read_all();
        entries.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(IntakeError::Storage)?;
        }

        let json = serde_json::to_string_pretty(&entries).map_err(IntakeError::Serialization)?;
        fs::write(&self.path, json).map_err(IntakeError::Storage)
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> IntakeResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| IntakeError::Storage(io::Error::other("storage lock poisoned")))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileKeyValueStore::new(temp_dir.path().join("nested"));

        assert_eq!(store.get_item("anything"), None);
    }

    #[test]
    fn test_file_store_set_then_get() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileKeyValueStore::new(temp_dir.path().join("nested"));

        store.set_item("a", "1").expect("first write should succeed");
        store.set_item("b", "2").expect("second write should succeed");

        assert_eq!(store.get_item("a").as_deref(), Some("1"));
        assert_eq!(store.get_item("b").as_deref(), Some("2"));
        assert!(store.path().is_file(), "storage file should exist");
    }

    #[test]
    fn test_file_store_corrupt_file_reads_empty_and_is_overwritten() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileKeyValueStore::new(temp_dir.path());
        fs::write(store.path(), "{not json").expect("write corrupt file");

        assert_eq!(store.get_item("a"), None);

        store.set_item("a", "1").expect("write over corrupt file");
        assert_eq!(store.get_item("a").as_deref(), Some("1"));
    }

    #[test]
    fn test_memory_store_replaces_values() {
        let store = MemoryKeyValueStore::new();
        store.set_item("k", "old").expect("write");
        store.set_item("k", "new").expect("overwrite");

        assert_eq!(store.get_item("k").as_deref(), Some("new"));
    }

    #[test]
    fn test_memory_store_poisoned_lock_is_storage_error() {
        let store = MemoryKeyValueStore::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.entries.lock().expect("lock should be free");
            panic!("poison the lock");
        }));

        let err = store
            .set_item("a", "1")
            .expect_err("poisoned lock should fail");
        assert!(matches!(err, IntakeError::Storage(_)));
        assert!(!err.is_validation());
    }
}
