// Key-value backends
//
// The storage facade sits on a synchronous string key-value store, the same shape
// as browser local storage:
// - InMemoryKeyValueStore for tests and throwaway sessions
// - FileKeyValueStore to keep data between console invocations

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::error::{GymError, Result};

/// Synchronous string key-value store
///
/// Implementations must be thread-safe; the facade shares one instance
/// across every domain API.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing what was there
    fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored
    fn keys(&self) -> Result<Vec<String>>;
}

// ============================================================================
// InMemoryKeyValueStore
// ============================================================================

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

// ============================================================================
// FileKeyValueStore
// ============================================================================

/// Key-value store persisted as one JSON object file
///
/// The whole file is loaded on open and rewritten after every mutation.
/// A missing file opens as an empty store.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                GymError::storage(format!("failed to read {}: {e}", path.display()))
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    GymError::storage(format!("failed to create {}: {e}", parent.display()))
                })?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content).map_err(|e| {
            GymError::storage(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        // Memory only changes once the file holds the new state
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}
