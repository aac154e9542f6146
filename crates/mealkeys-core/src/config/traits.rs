//! Configuration provider trait and settings model

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Settings for the credential helper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Registry name of the vault backing the credential store
    pub vault: String,
    /// Whether the resolver falls back to environment variables
    pub check_environment: bool,
    /// Prefix for environment variable names, e.g. `MEALPLANNER_`
    pub env_prefix: Option<String>,
    /// Minimum level written to the log file
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault: "keychain".to_string(),
            check_environment: true,
            env_prefix: None,
            log_level: LogLevel::Info,
        }
    }
}

/// Configuration provider abstraction
///
/// Implementations:
/// - `MemoryConfigProvider`: In-memory for testing
/// - `FileConfigProvider`: YAML file (~/.config/mealkeys/config.yaml)
pub trait ConfigProvider: Send + Sync {
    /// Load the current settings; a missing source yields the defaults
    fn load(&self) -> ConfigResult<Settings>;

    /// Persist `settings`
    fn save(&self, settings: &Settings) -> ConfigResult<()>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown vault: {0}")]
    UnknownVault(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
