//! In-memory configuration provider

use std::sync::RwLock;

use super::traits::{ConfigProvider, ConfigResult, Settings};

/// In-memory configuration provider for testing
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    settings: RwLock<Settings>,
}

impl MemoryConfigProvider {
    /// Provider holding the default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn load(&self) -> ConfigResult<Settings> {
        Ok(self.settings.read().unwrap().clone())
    }

    fn save(&self, settings: &Settings) -> ConfigResult<()> {
        *self.settings.write().unwrap() = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_config_provider() {
        let config = MemoryConfigProvider::new();
        assert_eq!(config.load().unwrap(), Settings::default());

        let settings = Settings {
            vault: "memory".to_string(),
            check_environment: false,
            ..Default::default()
        };
        config.save(&settings).unwrap();
        assert_eq!(config.load().unwrap(), settings);
    }
}
