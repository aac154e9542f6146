//! In-memory secret vault

use std::collections::HashMap;
use std::sync::RwLock;

use super::traits::{SecretVault, VaultError, VaultResult};

type EntryKey = (String, String);

/// In-memory vault for testing and ephemeral use
///
/// Entries are lost when the vault is dropped. `replace` is a single locked
/// insert, so a concurrent reader sees either the old or the new payload.
///
/// # Example
///
/// ```
/// use mealkeys_core::vault::{SecretVault, MemoryVault};
///
/// let vault = MemoryVault::new();
/// vault.replace("com.example.service", "api-key", b"one").unwrap();
/// vault.replace("com.example.service", "api-key", b"two").unwrap();
/// assert_eq!(vault.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryVault {
    entries: RwLock<HashMap<EntryKey, Vec<u8>>>,
}

fn entry_key(namespace: &str, account: &str) -> EntryKey {
    (namespace.to_string(), account.to_string())
}

impl MemoryVault {
    /// Create a new empty memory vault
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Number of entries in the vault
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecretVault for MemoryVault {
    fn name(&self) -> &str {
        "memory"
    }

    fn add(&self, namespace: &str, account: &str, payload: &[u8]) -> VaultResult<()> {
        let mut entries = self.entries.write().unwrap();
        let key = entry_key(namespace, account);
        if entries.contains_key(&key) {
            // Same contract as a platform vault: add never overwrites
            return Err(VaultError::Duplicate);
        }
        entries.insert(key, payload.to_vec());
        Ok(())
    }

    fn delete(&self, namespace: &str, account: &str) -> VaultResult<()> {
        let mut entries = self.entries.write().unwrap();
        entries
            .remove(&entry_key(namespace, account))
            .map(|_| ())
            .ok_or(VaultError::NotFound)
    }

    fn query(&self, namespace: &str, account: &str) -> VaultResult<Option<Vec<u8>>> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(&entry_key(namespace, account)).cloned())
    }

    fn replace(&self, namespace: &str, account: &str, payload: &[u8]) -> VaultResult<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(entry_key(namespace, account), payload.to_vec());
        Ok(())
    }
}
