//! Error types for the hub binary.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to initialize logging: {0}")]
    Telemetry(#[from] tracing_subscriber::util::TryInitError),
    #[error("Usage: {0}")]
    Usage(String),
    #[error("Unknown user: {0}")]
    UnknownUser(String),
}

pub type HubResult<T> = Result<T, HubError>;
