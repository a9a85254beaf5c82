//! Error types for Espora storage operations

use thiserror::Error;

/// Persistence layer errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed for key {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store file {path} is not a JSON object: {reason}")]
    CorruptStore { path: String, reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Write rejected for key {key}: {reason}")]
    WriteRejected { key: String, reason: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
