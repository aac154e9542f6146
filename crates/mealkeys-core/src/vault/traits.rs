//! Core traits and types for secret vaults

use thiserror::Error;

/// Errors reported by a secret vault
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("No entry in vault")]
    NotFound,

    #[error("Vault is read-only")]
    ReadOnly,

    #[error("Entry already exists")]
    Duplicate,

    #[error("Access to the vault was denied")]
    AccessDenied,

    #[error("Vault not available: {0}")]
    Unavailable(String),

    #[error("Payload rejected by the vault")]
    InvalidPayload,

    #[error("Platform error: {0}")]
    Platform(String),
}

pub type VaultResult<T> = Result<T, VaultError>;

/// A device-local key/value vault for small secret payloads
///
/// Entries are addressed by `(namespace, account)`. The credential store
/// fills `namespace` from a credential kind's identifier and uses one fixed
/// `account` for every kind.
///
/// Implementations:
/// - System keychain (`KeychainVault`)
/// - In-memory for testing (`MemoryVault`)
/// - Read-only environment variables (`EnvVault`)
///
/// # Example
///
/// ```
/// use mealkeys_core::vault::{SecretVault, MemoryVault};
///
/// let vault = MemoryVault::new();
/// vault.add("com.example.service", "api-key", b"secret").unwrap();
/// assert_eq!(
///     vault.query("com.example.service", "api-key").unwrap(),
///     Some(b"secret".to_vec())
/// );
/// ```
pub trait SecretVault: Send + Sync {
    /// Human-readable name of this vault
    fn name(&self) -> &str;

    /// Check if this vault can be used right now
    ///
    /// A keychain vault is not available on a headless machine without a
    /// secret service daemon, for example.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether writes are refused outright
    fn is_read_only(&self) -> bool {
        false
    }

    /// Insert a payload for `(namespace, account)`
    ///
    /// Vaults that refuse to overwrite return `Err(VaultError::Duplicate)`
    /// when an entry already exists; vaults that overwrite in place just
    /// succeed.
    fn add(&self, namespace: &str, account: &str, payload: &[u8]) -> VaultResult<()>;

    /// Remove the entry for `(namespace, account)`
    ///
    /// Returns `Err(VaultError::NotFound)` if there was nothing to remove.
    fn delete(&self, namespace: &str, account: &str) -> VaultResult<()>;

    /// Read the payload for `(namespace, account)`, `Ok(None)` if absent
    fn query(&self, namespace: &str, account: &str) -> VaultResult<Option<Vec<u8>>>;

    /// Replace any existing entry with `payload`
    ///
    /// The default tries `add` first. Only on `Duplicate` does it delete the
    /// old entry and add again, putting the old payload back if the second
    /// add fails. Either the new payload is stored or the old one is still
    /// there when this returns an error. Vaults with a native overwrite
    /// should override this.
    fn replace(&self, namespace: &str, account: &str, payload: &[u8]) -> VaultResult<()> {
        match self.add(namespace, account, payload) {
            Err(VaultError::Duplicate) => {}
            other => return other,
        }

        let previous = self.query(namespace, account)?;
        match self.delete(namespace, account) {
            Ok(()) | Err(VaultError::NotFound) => {}
            Err(e) => return Err(e),
        }

        if let Err(e) = self.add(namespace, account, payload) {
            if let Some(old) = previous {
                if let Err(restore) = self.add(namespace, account, &old) {
                    tracing::error!(namespace, error = %restore, "could not restore previous entry");
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Check if an entry exists
    fn contains(&self, namespace: &str, account: &str) -> bool {
        matches!(self.query(namespace, account), Ok(Some(_)))
    }
}
