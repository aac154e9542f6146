//! Configuration for the credential helper
//!
//! Supports multiple configuration sources:
//! - `MemoryConfigProvider`: In-memory for testing
//! - `FileConfigProvider`: YAML file at the user level
//!
//! [`open_store`] and [`open_resolver`] turn loaded settings into ready
//! credential objects; [`init_logging`] applies the configured log level.

mod traits;
mod memory;
mod file;

use crate::credentials::CredentialStore;
use crate::logging;
use crate::resolver::CredentialResolver;
use crate::vault::{create_vault, EnvVault};

pub use traits::{ConfigProvider, ConfigError, ConfigResult, Settings};
pub use memory::MemoryConfigProvider;
pub use file::FileConfigProvider;

/// Build a credential store over the vault named in `settings`
pub fn open_store(settings: &Settings) -> ConfigResult<CredentialStore> {
    let vault = create_vault(&settings.vault)
        .ok_or_else(|| ConfigError::UnknownVault(settings.vault.clone()))?;
    if !vault.is_available() {
        tracing::warn!(vault = vault.name(), "configured vault is not available");
    }
    Ok(CredentialStore::new(vault))
}

/// Start file logging at `settings.log_level`
///
/// Returns `false` if logging was already set up.
pub fn init_logging(settings: &Settings) -> bool {
    logging::init(settings.log_level)
}

/// Build a resolver honoring the environment settings
pub fn open_resolver(settings: &Settings) -> ConfigResult<CredentialResolver> {
    let environment = match &settings.env_prefix {
        Some(prefix) => EnvVault::with_prefix(prefix.clone()),
        None => EnvVault::new(),
    };
    let mut resolver = CredentialResolver::new(open_store(settings)?).with_environment(environment);
    resolver.set_check_environment(settings.check_environment);
    Ok(resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialKind;
    use crate::logging::LogLevel;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_open_store_memory() {
        let settings = Settings {
            vault: "memory".to_string(),
            ..Default::default()
        };
        let store = open_store(&settings).unwrap();
        assert_eq!(store.vault().name(), "memory");
        assert!(store.store(CredentialKind::OpenAi, "sk"));
    }

    #[test]
    fn test_open_store_unknown_vault() {
        let settings = Settings {
            vault: "carrier-pigeon".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            open_store(&settings),
            Err(ConfigError::UnknownVault(name)) if name == "carrier-pigeon"
        ));
    }

    #[test]
    fn test_open_resolver_applies_environment_settings() {
        let settings = Settings {
            vault: "memory".to_string(),
            check_environment: false,
            env_prefix: Some("OPENTEST_".to_string()),
            ..Default::default()
        };
        let resolver = open_resolver(&settings).unwrap();
        assert!(!resolver.check_environment());
        assert_eq!(resolver.store().vault().name(), "memory");
    }

    #[test]
    fn test_init_logging_uses_configured_level() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "vault: memory\nlog_level: debug\n").unwrap();
        let settings = FileConfigProvider::new(&path).load().unwrap();
        assert_eq!(settings.log_level, LogLevel::Debug);

        // Another test (or a host subscriber) may have won the race, but
        // every caller in this crate's tests asks for debug
        init_logging(&settings);
        assert!(!logging::init(LogLevel::Error));
        assert!(matches!(logging::installed_level(), None | Some(LogLevel::Debug)));
    }
}
