//! Typed reads carrying change-detection metadata.
//!
//! A [`Snapshot`] pairs a decoded value with the fingerprint of the raw blob
//! it was decoded from. Comparing fingerprints later tells a reader whether
//! somebody else has written the key since.

use espora_core::Fingerprint;

/// Result of a typed read from the store.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    value: T,
    /// Fingerprint of the raw blob, `None` when the key was absent.
    fingerprint: Option<Fingerprint>,
    /// Whether the raw blob was present but could not be decoded.
    degraded: bool,
}

impl<T> Snapshot<T> {
    pub fn new(value: T, fingerprint: Option<Fingerprint>, degraded: bool) -> Self {
        Self {
            value,
            fingerprint,
            degraded,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint
    }

    /// True when the stored blob was malformed and the default was used.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// True when the key was absent from the store.
    pub fn is_absent(&self) -> bool {
        self.fingerprint.is_none()
    }
}
