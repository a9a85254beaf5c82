//! Typed JSON adapter over the key-value port.
//!
//! Reads never fail: an absent key, an unreadable store or a blob that does
//! not decode into the expected shape all degrade to `T::default()`. Writes
//! report their error so callers can log it.

use crate::{KvStore, Snapshot, StorageKey};
use espora_core::{fingerprint, Fingerprint, StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Typed read/write access to the persisted checklist keys.
#[derive(Clone)]
pub struct LocalStore {
    port: Arc<dyn KvStore>,
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore").finish_non_exhaustive()
    }
}

impl LocalStore {
    pub fn new(port: Arc<dyn KvStore>) -> Self {
        Self { port }
    }

    /// The underlying port, for sharing with a refresher.
    pub fn port(&self) -> Arc<dyn KvStore> {
        Arc::clone(&self.port)
    }

    /// Decode the value under `key`, or `T::default()`.
    pub fn load<T>(&self, key: StorageKey) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.load_snapshot(key).into_value()
    }

    /// Decode the value under `key` together with its fingerprint.
    pub fn load_snapshot<T>(&self, key: StorageKey) -> Snapshot<T>
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self.port.get(key.as_str()) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Store read failed, using empty default");
                return Snapshot::new(T::default(), None, true);
            }
        };
        let Some(raw) = raw else {
            return Snapshot::new(T::default(), None, false);
        };
        let fp = Some(fingerprint(raw.as_bytes()));
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Snapshot::new(value, fp, false),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Malformed persisted value, using empty default");
                Snapshot::new(T::default(), fp, true)
            }
        }
    }

    /// Fingerprint of the raw blob currently stored under `key`.
    pub fn fingerprint(&self, key: StorageKey) -> Option<Fingerprint> {
        match self.port.get(key.as_str()) {
            Ok(raw) => raw.map(|raw| fingerprint(raw.as_bytes())),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Store read failed while fingerprinting");
                None
            }
        }
    }

    /// Serialize `value` under `key`, returning the fingerprint written.
    pub fn save<T>(&self, key: StorageKey, value: &T) -> StorageResult<Fingerprint>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.port.set(key.as_str(), &raw)?;
        Ok(fingerprint(raw.as_bytes()))
    }

    pub fn remove(&self, key: StorageKey) -> StorageResult<()> {
        self.port.remove(key.as_str())
    }
}
