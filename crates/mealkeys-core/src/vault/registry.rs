//! Vault registry for discovering and creating vaults by name

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use super::env_vault::EnvVault;
use super::keychain_vault::KeychainVault;
use super::memory_vault::MemoryVault;
use super::traits::SecretVault;

/// Factory function type for creating vaults
pub type VaultFactory = Box<dyn Fn() -> Arc<dyn SecretVault> + Send + Sync>;

/// Definition of a registered vault
pub struct VaultDefinition {
    /// Unique name for this vault
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Factory function to create instances
    pub factory: VaultFactory,
}

impl std::fmt::Debug for VaultDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

fn builtin(name: &str, description: &str, factory: VaultFactory) -> (String, VaultDefinition) {
    (
        name.to_string(),
        VaultDefinition {
            name: name.to_string(),
            description: description.to_string(),
            factory,
        },
    )
}

/// Global registry of vaults
static REGISTRY: Lazy<RwLock<HashMap<String, VaultDefinition>>> = Lazy::new(|| {
    let map = HashMap::from([
        builtin(
            "keychain",
            "System keychain (macOS Keychain, Windows Credential Manager, Linux Secret Service)",
            Box::new(|| Arc::new(KeychainVault::new())),
        ),
        builtin(
            "memory",
            "In-memory storage for testing",
            Box::new(|| Arc::new(MemoryVault::new())),
        ),
        builtin(
            "env",
            "Read-only API keys from environment variables",
            Box::new(|| Arc::new(EnvVault::new())),
        ),
    ]);
    RwLock::new(map)
});

/// Register a new vault type, replacing any previous one with the same name
///
/// # Example
///
/// ```
/// use mealkeys_core::vault::{register_vault, create_vault, MemoryVault};
/// use std::sync::Arc;
///
/// register_vault(
///     "scratch",
///     "Per-call scratch vault",
///     Box::new(|| Arc::new(MemoryVault::new())),
/// );
/// assert!(create_vault("scratch").is_some());
/// ```
pub fn register_vault(name: &str, description: &str, factory: VaultFactory) {
    let mut registry = REGISTRY.write().unwrap();
    let (key, definition) = builtin(name, description, factory);
    registry.insert(key, definition);
}

/// Create a vault by name, `None` if the name is not registered
pub fn create_vault(name: &str) -> Option<Arc<dyn SecretVault>> {
    let registry = REGISTRY.read().unwrap();
    registry.get(name).map(|def| (def.factory)())
}

/// List all registered vaults as `(name, description)` pairs, sorted by name
pub fn list_vaults() -> Vec<(String, String)> {
    let registry = REGISTRY.read().unwrap();
    let mut vaults: Vec<_> = registry
        .values()
        .map(|def| (def.name.clone(), def.description.clone()))
        .collect();
    vaults.sort();
    vaults
}

/// Check if a vault is registered
pub fn has_vault(name: &str) -> bool {
    REGISTRY.read().unwrap().contains_key(name)
}

/// Unregister a vault (mainly for testing)
pub fn unregister_vault(name: &str) -> bool {
    REGISTRY.write().unwrap().remove(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_vaults_registered() {
        assert!(has_vault("keychain"));
        assert!(has_vault("memory"));
        assert!(has_vault("env"));
    }

    #[test]
    fn test_create_builtin_vaults() {
        assert_eq!(create_vault("memory").unwrap().name(), "memory");
        assert_eq!(create_vault("env").unwrap().name(), "env");
        assert_eq!(create_vault("keychain").unwrap().name(), "keychain");
    }

    #[test]
    fn test_memory_factory_creates_fresh_vaults() {
        let a = create_vault("memory").unwrap();
        let b = create_vault("memory").unwrap();
        a.add("ns", "acct", b"x").unwrap();
        assert_eq!(b.query("ns", "acct").unwrap(), None);
    }

    #[test]
    fn test_create_unknown_vault() {
        assert!(create_vault("nonexistent_vault_xyz").is_none());
    }

    #[test]
    fn test_list_vaults() {
        let names: Vec<_> = list_vaults().into_iter().map(|(n, _)| n).collect();
        assert!(names.contains(&"keychain".to_string()));
        assert!(names.contains(&"memory".to_string()));
        assert!(names.contains(&"env".to_string()));
    }

    #[test]
    fn test_register_custom_vault() {
        register_vault(
            "test_custom_vault",
            "A test vault",
            Box::new(|| Arc::new(MemoryVault::new())),
        );
        assert!(has_vault("test_custom_vault"));
        assert_eq!(create_vault("test_custom_vault").unwrap().name(), "memory");

        assert!(unregister_vault("test_custom_vault"));
        assert!(!has_vault("test_custom_vault"));
    }
}
