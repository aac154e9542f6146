//! Environment variable vault

use std::env;

use super::traits::{SecretVault, VaultError, VaultResult};
use crate::credentials::CredentialKind;

/// Read-only vault that serves credentials from environment variables
///
/// A namespace is mapped back to its [`CredentialKind`] and the kind's
/// variables are checked in order (`USDA_API_KEY`, then `FDC_API_KEY`, ...).
/// The first non-empty value wins. The account is ignored since every kind
/// has exactly one slot.
///
/// Writes always fail with `VaultError::ReadOnly`. Use this for headless runs
/// and for the one-time import of keys that used to live in a shell profile.
///
/// # Example
///
/// ```
/// use mealkeys_core::vault::{SecretVault, EnvVault};
///
/// let vault = EnvVault::new();
/// // Reads OPENAI_API_KEY when it is set
/// let _ = vault.query("com.mealplanner.openai", "api-key");
/// ```
#[derive(Debug, Default, Clone)]
pub struct EnvVault {
    prefix: String,
}

impl EnvVault {
    /// Read the kinds' variables as-is
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `<prefix><VAR>` instead of `<VAR>`, e.g. `MEALPLANNER_OPENAI_API_KEY`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Variable names consulted for `kind`, with the prefix applied
    pub fn var_names(&self, kind: CredentialKind) -> Vec<String> {
        kind.env_vars()
            .iter()
            .map(|var| format!("{}{}", self.prefix, var))
            .collect()
    }
}

impl SecretVault for EnvVault {
    fn name(&self) -> &str {
        "env"
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn add(&self, _namespace: &str, _account: &str, _payload: &[u8]) -> VaultResult<()> {
        Err(VaultError::ReadOnly)
    }

    fn delete(&self, _namespace: &str, _account: &str) -> VaultResult<()> {
        Err(VaultError::ReadOnly)
    }

    fn replace(&self, _namespace: &str, _account: &str, _payload: &[u8]) -> VaultResult<()> {
        Err(VaultError::ReadOnly)
    }

    fn query(&self, namespace: &str, _account: &str) -> VaultResult<Option<Vec<u8>>> {
        let Some(kind) = CredentialKind::from_identifier(namespace) else {
            return Ok(None);
        };

        for var in self.var_names(kind) {
            if let Ok(value) = env::var(&var) {
                if !value.is_empty() {
                    tracing::debug!(var = %var, "credential found in environment");
                    return Ok(Some(value.into_bytes()));
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every test uses its own prefix so parallel tests never share variables

    #[test]
    fn test_env_vault_name() {
        assert_eq!(EnvVault::new().name(), "env");
    }

    #[test]
    fn test_env_vault_read_only() {
        let vault = EnvVault::new();
        assert!(vault.is_read_only());
        assert_eq!(vault.add("ns", "acct", b"v"), Err(VaultError::ReadOnly));
        assert_eq!(vault.delete("ns", "acct"), Err(VaultError::ReadOnly));
        assert_eq!(vault.replace("ns", "acct", b"v"), Err(VaultError::ReadOnly));
    }

    #[test]
    fn test_env_vault_reads_kind_variable() {
        env::set_var("ENVTEST_A_OPENAI_API_KEY", "sk-env");
        let vault = EnvVault::with_prefix("ENVTEST_A_");

        assert_eq!(
            vault.query(CredentialKind::OpenAi.identifier(), "api-key").unwrap(),
            Some(b"sk-env".to_vec())
        );
        env::remove_var("ENVTEST_A_OPENAI_API_KEY");
    }

    #[test]
    fn test_env_vault_falls_through_to_second_variable() {
        env::set_var("ENVTEST_B_GEMINI_API_KEY", "");
        env::set_var("ENVTEST_B_GOOGLE_API_KEY", "g-key");
        let vault = EnvVault::with_prefix("ENVTEST_B_");

        assert_eq!(
            vault.query(CredentialKind::Gemini.identifier(), "api-key").unwrap(),
            Some(b"g-key".to_vec())
        );
        env::remove_var("ENVTEST_B_GEMINI_API_KEY");
        env::remove_var("ENVTEST_B_GOOGLE_API_KEY");
    }

    #[test]
    fn test_env_vault_unknown_namespace() {
        let vault = EnvVault::with_prefix("ENVTEST_C_");
        assert_eq!(vault.query("com.other.service", "api-key").unwrap(), None);
        assert_eq!(
            vault.query(CredentialKind::Anthropic.identifier(), "api-key").unwrap(),
            None
        );
    }

    #[test]
    fn test_var_names() {
        let vault = EnvVault::with_prefix("MP_");
        assert_eq!(
            vault.var_names(CredentialKind::NutritionDatabase),
            vec!["MP_USDA_API_KEY".to_string(), "MP_FDC_API_KEY".to_string()]
        );
    }
}
