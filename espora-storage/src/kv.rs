//! Key-value persistence port.

use espora_core::{StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// String key-value store holding serialized state.
///
/// Implementations must be safe to share between a session and a refresher
/// task. Each call is atomic with respect to the other calls on the same
/// store.
pub trait KvStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the raw value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// In-memory store for tests and embedding.
///
/// An optional per-value byte limit emulates the quota of a browser store so
/// write-failure paths can be exercised.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
    write_limit: RwLock<Option<usize>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every `set` whose value exceeds `limit` bytes (`None` lifts it).
    pub fn set_write_limit(&self, limit: Option<usize>) {
        if let Ok(mut guard) = self.write_limit.write() {
            *guard = limit;
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored key and value.
    pub fn dump(&self) -> HashMap<String, String> {
        self.entries.read().map(|e| e.clone()).unwrap_or_default()
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let limit = *self
            .write_limit
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        if let Some(limit) = limit {
            if value.len() > limit {
                return Err(StorageError::WriteRejected {
                    key: key.to_string(),
                    reason: format!("quota exceeded ({} > {} bytes)", value.len(), limit),
                });
            }
        }
        let mut entries = self.entries.write().map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| StorageError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}
