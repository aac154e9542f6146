//! System keychain vault
//!
//! Uses the OS credential facility through the `keyring` crate:
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use keyring::Entry;

use super::traits::{SecretVault, VaultError, VaultResult};

/// Namespace used to probe whether the platform store can be reached
const AVAILABILITY_PROBE: &str = "com.mealplanner.availability-check";

/// Vault backed by the system keychain
///
/// Each `(namespace, account)` pair is one keychain entry, with `namespace`
/// as the keyring service and `account` as the keyring user. Entries are
/// created in the current user's default store and are never marked for
/// cloud sync, so they stay on this device and are only readable while the
/// user session is unlocked.
///
/// # Example
///
/// ```no_run
/// use mealkeys_core::vault::{KeychainVault, SecretVault};
///
/// let vault = KeychainVault::new();
/// vault.replace("com.mealplanner.openai", "api-key", b"sk-...").unwrap();
/// assert!(vault.contains("com.mealplanner.openai", "api-key"));
/// ```
#[derive(Debug, Default)]
pub struct KeychainVault {
    _private: (),
}

impl KeychainVault {
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn entry(namespace: &str, account: &str) -> VaultResult<Entry> {
        Entry::new(namespace, account).map_err(map_keyring_error)
    }
}

/// Translate a `keyring` failure into the vault error taxonomy
fn map_keyring_error(err: keyring::Error) -> VaultError {
    match err {
        keyring::Error::NoEntry => VaultError::NotFound,
        keyring::Error::NoStorageAccess(e) => {
            tracing::debug!(cause = %e, "keychain refused access");
            VaultError::AccessDenied
        }
        keyring::Error::BadEncoding(_) => VaultError::InvalidPayload,
        keyring::Error::TooLong(attr, limit) => {
            tracing::debug!(attribute = %attr, limit, "keychain attribute too long");
            VaultError::InvalidPayload
        }
        keyring::Error::Invalid(attr, reason) => {
            VaultError::Platform(format!("invalid {}: {}", attr, reason))
        }
        keyring::Error::PlatformFailure(e) => VaultError::Platform(e.to_string()),
        other => VaultError::Platform(other.to_string()),
    }
}

impl SecretVault for KeychainVault {
    fn name(&self) -> &str {
        "keychain"
    }

    fn is_available(&self) -> bool {
        // Building an entry does not reach the backend; a read does
        let probe = Entry::new(AVAILABILITY_PROBE, "probe").and_then(|entry| entry.get_secret());
        match probe {
            Ok(_) | Err(keyring::Error::NoEntry) => true,
            Err(e) => {
                tracing::warn!(error = %e, "system keychain not available");
                false
            }
        }
    }

    fn add(&self, namespace: &str, account: &str, payload: &[u8]) -> VaultResult<()> {
        let entry = Self::entry(namespace, account)?;
        entry.set_secret(payload).map_err(|e| {
            tracing::warn!(namespace, error = %e, "keychain add failed");
            map_keyring_error(e)
        })?;
        tracing::debug!(namespace, len = payload.len(), "keychain entry written");
        Ok(())
    }

    fn delete(&self, namespace: &str, account: &str) -> VaultResult<()> {
        let entry = Self::entry(namespace, account)?;
        entry.delete_credential().map_err(map_keyring_error)?;
        tracing::debug!(namespace, "keychain entry deleted");
        Ok(())
    }

    /// One `set_secret`, which overwrites an existing item in place
    fn replace(&self, namespace: &str, account: &str, payload: &[u8]) -> VaultResult<()> {
        let entry = Self::entry(namespace, account)?;
        entry.set_secret(payload).map_err(|e| {
            tracing::warn!(namespace, error = %e, "keychain replace failed");
            map_keyring_error(e)
        })?;
        tracing::debug!(namespace, len = payload.len(), "keychain entry replaced");
        Ok(())
    }

    fn query(&self, namespace: &str, account: &str) -> VaultResult<Option<Vec<u8>>> {
        let entry = Self::entry(namespace, account)?;
        match entry.get_secret() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                tracing::warn!(namespace, error = %e, "keychain query failed");
                Err(map_keyring_error(e))
            }
        }
    }
}
