//! Credential store over an injected secret vault

use std::sync::Arc;

use super::kind::CredentialKind;
use crate::vault::{KeychainVault, SecretVault, VaultError};

/// Stored nutrition-database value meaning "demo mode, no real key"
pub const DEMO_MODE_SENTINEL: &str = "DEMO_MODE";

/// Vault account shared by every credential kind
pub const CREDENTIAL_ACCOUNT: &str = "api-key";

/// Outcome of reading one credential, keeping failures apart from absence
///
/// [`CredentialStore::retrieve`] folds this into an `Option`; status UIs that
/// want to say "keychain locked" rather than "not configured" use
/// [`CredentialStore::lookup`] directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// A record exists and decoded as text
    Found(String),
    /// No record for this kind
    NotFound,
    /// The vault refused or failed, or the record is not valid text
    Failed(VaultError),
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Collapse to the two-state view: `Some` only for `Found`
    pub fn into_option(self) -> Option<String> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound | Lookup::Failed(_) => None,
        }
    }
}

/// Device-local store for the meal planner's API credentials
///
/// Every kind occupies one vault entry at `(kind.identifier(), "api-key")`.
/// The store keeps no cache and takes no locks; the vault is the only
/// source of truth. Vault failures never escape: writes report `false`,
/// reads report `None`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mealkeys_core::credentials::{CredentialKind, CredentialStore};
/// use mealkeys_core::vault::MemoryVault;
///
/// let store = CredentialStore::new(Arc::new(MemoryVault::new()));
///
/// assert!(store.store(CredentialKind::NutritionDatabase, "abc123"));
/// assert_eq!(store.nutrition_database_key(), Some("abc123".to_string()));
///
/// assert!(store.store(CredentialKind::NutritionDatabase, "DEMO_MODE"));
/// assert!(store.is_demo_mode());
/// assert_eq!(store.nutrition_database_key(), None);
/// ```
#[derive(Clone)]
pub struct CredentialStore {
    vault: Arc<dyn SecretVault>,
}

impl CredentialStore {
    /// Create a store over the given vault
    pub fn new(vault: Arc<dyn SecretVault>) -> Self {
        Self { vault }
    }

    /// Create a store over the system keychain
    pub fn keychain() -> Self {
        Self::new(Arc::new(KeychainVault::new()))
    }

    /// The vault backing this store
    pub fn vault(&self) -> &Arc<dyn SecretVault> {
        &self.vault
    }

    /// Save `value` for `kind`, replacing any previous value
    ///
    /// An empty `value`, or a read-only vault, is rejected without touching
    /// the vault. Returns `true` iff the vault accepted the new record; on
    /// `false` the previous record (if any) is unchanged.
    pub fn store(&self, kind: CredentialKind, value: &str) -> bool {
        if value.is_empty() {
            tracing::warn!(kind = %kind, "refusing to store empty credential");
            return false;
        }
        if self.vault.is_read_only() {
            tracing::warn!(kind = %kind, vault = self.vault.name(), "vault is read-only, credential not stored");
            return false;
        }

        match self
            .vault
            .replace(kind.identifier(), CREDENTIAL_ACCOUNT, value.as_bytes())
        {
            Ok(()) => {
                tracing::info!(kind = %kind, vault = self.vault.name(), "credential stored");
                true
            }
            Err(e) => {
                tracing::warn!(kind = %kind, vault = self.vault.name(), error = %e, "credential store failed");
                false
            }
        }
    }

    /// Read the raw record for `kind` without collapsing failures
    pub fn lookup(&self, kind: CredentialKind) -> Lookup {
        match self.vault.query(kind.identifier(), CREDENTIAL_ACCOUNT) {
            Ok(Some(bytes)) => match String::from_utf8(bytes) {
                Ok(value) => Lookup::Found(value),
                Err(_) => {
                    tracing::warn!(kind = %kind, "stored credential is not valid UTF-8");
                    Lookup::Failed(VaultError::InvalidPayload)
                }
            },
            Ok(None) | Err(VaultError::NotFound) => Lookup::NotFound,
            Err(e) => {
                tracing::warn!(kind = %kind, vault = self.vault.name(), error = %e, "credential lookup failed");
                Lookup::Failed(e)
            }
        }
    }

    /// Read the raw value for `kind`
    ///
    /// Never stored, vault failure and undecodable data all come back as `None`.
    pub fn retrieve(&self, kind: CredentialKind) -> Option<String> {
        self.lookup(kind).into_option()
    }

    /// Whether a raw value is present for `kind`
    pub fn exists(&self, kind: CredentialKind) -> bool {
        self.retrieve(kind).is_some()
    }

    /// The usable value for `kind`
    ///
    /// Same as [`retrieve`](Self::retrieve), except that the demo-mode
    /// sentinel reads as `None` for kinds that honor it.
    pub fn configured_value(&self, kind: CredentialKind) -> Option<String> {
        self.retrieve(kind)
            .filter(|value| !(kind.honors_demo_sentinel() && value == DEMO_MODE_SENTINEL))
    }

    /// Nutrition database key, `None` when absent or in demo mode
    pub fn nutrition_database_key(&self) -> Option<String> {
        self.configured_value(CredentialKind::NutritionDatabase)
    }

    /// Key for an assistant provider
    pub fn assistant_key(&self, kind: CredentialKind) -> Option<String> {
        debug_assert!(kind.is_assistant(), "{} is not an assistant provider", kind);
        self.configured_value(kind)
    }

    pub fn openai_key(&self) -> Option<String> {
        self.assistant_key(CredentialKind::OpenAi)
    }

    pub fn anthropic_key(&self) -> Option<String> {
        self.assistant_key(CredentialKind::Anthropic)
    }

    pub fn gemini_key(&self) -> Option<String> {
        self.assistant_key(CredentialKind::Gemini)
    }

    /// True iff the raw nutrition-database value is exactly the sentinel
    pub fn is_demo_mode(&self) -> bool {
        self.retrieve(CredentialKind::NutritionDatabase).as_deref() == Some(DEMO_MODE_SENTINEL)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("vault", &self.vault.name())
            .finish()
    }
}
