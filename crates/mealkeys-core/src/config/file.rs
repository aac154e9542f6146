//! File-based configuration provider (YAML)
//!
//! The user-level file lives at `<config dir>/mealkeys/config.yaml`
//! (`~/.config` on Linux, `~/Library/Application Support` on macOS).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::traits::{ConfigProvider, ConfigResult, Settings};

/// File-based configuration provider
///
/// Reads are cached until [`reload`](Self::reload) or a save.
///
/// # Example
///
/// ```no_run
/// use mealkeys_core::config::{ConfigProvider, FileConfigProvider};
///
/// let config = FileConfigProvider::user();
/// let settings = config.load().unwrap();
/// println!("vault: {}", settings.vault);
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    cache: RwLock<Option<Settings>>,
}

impl FileConfigProvider {
    /// Create a provider for a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// Create the user-level provider
    pub fn user() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        Self::new(config_dir.join("mealkeys").join("config.yaml"))
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read_file(&self) -> ConfigResult<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Reload settings from disk, dropping the cache
    pub fn reload(&self) -> ConfigResult<Settings> {
        let settings = self.read_file()?;
        *self.cache.write().unwrap() = Some(settings.clone());
        Ok(settings)
    }

    /// Copy the current file next to itself as `config.yaml.backup`
    pub fn backup(&self) -> ConfigResult<Option<PathBuf>> {
        if !self.exists() {
            return Ok(None);
        }
        let backup_path = self.path.with_extension("yaml.backup");
        fs::copy(&self.path, &backup_path)?;
        Ok(Some(backup_path))
    }

    /// Export the settings as JSON (for host UIs)
    pub fn export_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(&self.load()?)?)
    }

    /// Replace the settings with a JSON document
    pub fn import_json(&self, json: &str) -> ConfigResult<()> {
        let settings: Settings = serde_json::from_str(json)?;
        self.save(&settings)
    }
}

impl ConfigProvider for FileConfigProvider {
    fn load(&self) -> ConfigResult<Settings> {
        if let Some(settings) = self.cache.read().unwrap().as_ref() {
            return Ok(settings.clone());
        }
        self.reload()
    }

    fn save(&self, settings: &Settings) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_yaml::to_string(settings)?)?;
        *self.cache.write().unwrap() = Some(settings.clone());
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("exists", &self.exists())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::logging::LogLevel;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("config.yaml"));

        assert!(!provider.exists());
        assert_eq!(provider.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let provider = FileConfigProvider::new(&path);

        let settings = Settings {
            vault: "memory".to_string(),
            env_prefix: Some("MEALPLANNER_".to_string()),
            log_level: LogLevel::Debug,
            ..Default::default()
        };
        provider.save(&settings).unwrap();
        assert!(provider.exists());

        let fresh = FileConfigProvider::new(&path);
        assert_eq!(fresh.load().unwrap(), settings);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("vault: memory"));
        assert!(content.contains("MEALPLANNER_"));
    }

    #[test]
    fn test_reload_picks_up_external_edits() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let provider = FileConfigProvider::new(&path);
        assert_eq!(provider.load().unwrap().vault, "keychain");

        fs::write(&path, "vault: env\n").unwrap();
        // Still cached
        assert_eq!(provider.load().unwrap().vault, "keychain");
        assert_eq!(provider.reload().unwrap().vault, "env");
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "vault: [unclosed").unwrap();

        let provider = FileConfigProvider::new(&path);
        assert!(matches!(provider.load(), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let provider = FileConfigProvider::new(&path);

        assert!(provider.backup().unwrap().is_none());

        fs::write(&path, "vault: memory\n").unwrap();
        let backup_path = provider.backup().unwrap().unwrap();
        assert!(backup_path.exists());
        assert!(backup_path.to_string_lossy().ends_with("config.yaml.backup"));
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("config.yaml"));

        provider
            .import_json(r#"{"vault": "env", "check_environment": false}"#)
            .unwrap();
        let settings = provider.load().unwrap();
        assert_eq!(settings.vault, "env");
        assert!(!settings.check_environment);

        let json = provider.export_json().unwrap();
        assert!(json.contains("\"vault\": \"env\""));
    }
}
