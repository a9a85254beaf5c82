//! Configuration loading for the hub binary.
//!
//! All fields are required. No defaults.

use espora_checklist::{RoleAuthorizer, StaticUserDirectory};
use espora_core::{Role, User, UserId};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV_VAR: &str = "ESPORA_HUB_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    /// JSON file holding every persisted checklist key.
    pub store_path: PathBuf,
    pub refresh_interval_ms: u64,
    /// Id of the user mutations are performed as.
    pub current_user: String,
    pub log: LogConfig,
    pub users: Vec<UserConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `json` or `pretty`.
    pub format: String,
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl From<&UserConfig> for User {
    fn from(user: &UserConfig) -> Self {
        User::new(user.id.as_str(), user.name.as_str(), user.role)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or ESPORA_HUB_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl HubConfig {
    /// Load from `cli_path`, falling back to `ESPORA_HUB_CONFIG`.
    pub fn load(cli_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = cli_path.or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: HubConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "refresh_interval_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if !matches!(self.log.format.as_str(), "json" | "pretty") {
            return Err(ConfigError::InvalidValue {
                field: "log.format",
                reason: "must be 'json' or 'pretty'".to_string(),
            });
        }
        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log.filter",
                reason: "must not be empty".to_string(),
            });
        }
        let mut seen = HashSet::new();
        for user in &self.users {
            if user.id.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "users.id",
                    reason: "must not be empty".to_string(),
                });
            }
            if !seen.insert(user.id.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "users.id",
                    reason: format!("duplicate id '{}'", user.id),
                });
            }
        }
        if !seen.contains(self.current_user.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "current_user",
                reason: format!("'{}' is not listed in users", self.current_user),
            });
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn is_json_log(&self) -> bool {
        self.log.format == "json"
    }

    pub fn user_list(&self) -> Vec<User> {
        self.users.iter().map(User::from).collect()
    }

    pub fn current_user(&self) -> Option<User> {
        let id = UserId::from(self.current_user.as_str());
        self.users.iter().map(User::from).find(|u| u.id == id)
    }

    pub fn directory(&self) -> StaticUserDirectory {
        StaticUserDirectory::new(self.user_list())
    }

    pub fn authorizer(&self) -> RoleAuthorizer {
        RoleAuthorizer::new(self.current_user())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from)
}
