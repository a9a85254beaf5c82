//! Espora Hub command-line host.
//!
//! Loads a TOML config, opens the JSON file store and runs one checklist
//! command as the configured user.

pub mod commands;
pub mod config;
pub mod error;
pub mod telemetry;

pub use commands::{execute, parse_args, watch, Command, Invocation};
pub use config::{ConfigError, HubConfig};
pub use error::{HubError, HubResult};
