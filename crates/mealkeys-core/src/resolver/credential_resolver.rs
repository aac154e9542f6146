//! Credential resolution across the vault and the environment
//!
//! Checks sources in priority order:
//! 1. The credential store's vault (keychain by default)
//! 2. Environment variables (if enabled)
//!
//! A nutrition-database record holding the demo sentinel stops resolution:
//! demo mode is an explicit choice and is not overridden by the environment.

use crate::credentials::{CredentialKind, CredentialStore, DEMO_MODE_SENTINEL};
use crate::vault::{EnvVault, SecretVault};

/// Result of resolving a credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub kind: CredentialKind,
    /// The secret value
    pub value: String,
    /// Which source provided it ("keychain", "env", ...)
    pub source: String,
    /// Human-readable source description
    pub source_detail: String,
}

/// Read-side resolver used by the parts of the app that call third-party APIs
///
/// Writes still go through [`CredentialStore::store`]; the environment is
/// never written to.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mealkeys_core::credentials::{CredentialKind, CredentialStore};
/// use mealkeys_core::resolver::CredentialResolver;
/// use mealkeys_core::vault::MemoryVault;
///
/// let store = CredentialStore::new(Arc::new(MemoryVault::new()));
/// store.store(CredentialKind::OpenAi, "sk-test");
///
/// let resolver = CredentialResolver::new(store);
/// let resolved = resolver.resolve(CredentialKind::OpenAi).unwrap();
/// assert_eq!(resolved.value, "sk-test");
/// assert_eq!(resolved.source, "memory");
/// ```
#[derive(Debug)]
pub struct CredentialResolver {
    store: CredentialStore,
    environment: EnvVault,
    check_environment: bool,
}

impl CredentialResolver {
    /// Resolver over `store`, falling back to the unprefixed environment
    pub fn new(store: CredentialStore) -> Self {
        Self {
            store,
            environment: EnvVault::new(),
            check_environment: true,
        }
    }

    /// Use a custom environment vault (e.g. with a variable prefix)
    pub fn with_environment(mut self, environment: EnvVault) -> Self {
        self.environment = environment;
        self
    }

    /// Set whether to check environment variables
    pub fn set_check_environment(&mut self, check: bool) {
        self.check_environment = check;
    }

    pub fn check_environment(&self) -> bool {
        self.check_environment
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Resolve a usable value for `kind`
    pub fn resolve(&self, kind: CredentialKind) -> Option<ResolvedCredential> {
        if let Some(value) = self.store.retrieve(kind) {
            if kind.honors_demo_sentinel() && value == DEMO_MODE_SENTINEL {
                tracing::debug!(kind = %kind, "demo mode set, not resolving");
                return None;
            }
            let vault = self.store.vault().name().to_string();
            return Some(ResolvedCredential {
                kind,
                value,
                source_detail: format!("{} vault ({})", vault, kind.identifier()),
                source: vault,
            });
        }

        if self.check_environment {
            if let Some(resolved) = self.resolve_from_environment(kind) {
                return Some(resolved);
            }
        }

        tracing::debug!(kind = %kind, "credential not found in any source");
        None
    }

    fn resolve_from_environment(&self, kind: CredentialKind) -> Option<ResolvedCredential> {
        let bytes = self
            .environment
            .query(kind.identifier(), "")
            .ok()
            .flatten()?;
        let value = String::from_utf8(bytes).ok()?;
        if kind.honors_demo_sentinel() && value == DEMO_MODE_SENTINEL {
            return None;
        }

        // Report the variable that actually matched
        let var = self
            .environment
            .var_names(kind)
            .into_iter()
            .find(|var| std::env::var(var).map(|v| !v.is_empty()).unwrap_or(false))
            .unwrap_or_default();

        Some(ResolvedCredential {
            kind,
            value,
            source: self.environment.name().to_string(),
            source_detail: format!("Environment variable ${}", var),
        })
    }

    /// Whether a usable value can be resolved for `kind`
    pub fn is_available(&self, kind: CredentialKind) -> bool {
        self.resolve(kind).is_some()
    }

    /// Source name per kind, `None` for kinds that resolve to nothing
    pub fn sources(&self) -> Vec<(CredentialKind, Option<String>)> {
        CredentialKind::ALL
            .into_iter()
            .map(|kind| (kind, self.resolve(kind).map(|r| r.source)))
            .collect()
    }

    /// Sources consulted, with whether each is currently available
    pub fn list_sources(&self) -> Vec<(String, bool)> {
        let mut sources = vec![(
            self.store.vault().name().to_string(),
            self.store.vault().is_available(),
        )];
        if self.check_environment {
            sources.push((self.environment.name().to_string(), true));
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::MemoryVault;
    use std::env;
    use std::sync::Arc;

    fn resolver(prefix: &str) -> CredentialResolver {
        let store = CredentialStore::new(Arc::new(MemoryVault::new()));
        CredentialResolver::new(store).with_environment(EnvVault::with_prefix(prefix))
    }

    #[test]
    fn test_resolve_from_vault() {
        let resolver = resolver("RESOLVETEST_A_");
        resolver.store().store(CredentialKind::Anthropic, "sk-ant");

        let resolved = resolver.resolve(CredentialKind::Anthropic).unwrap();
        assert_eq!(resolved.value, "sk-ant");
        assert_eq!(resolved.source, "memory");
        assert!(resolved.source_detail.contains("com.mealplanner.anthropic"));
    }

    #[test]
    fn test_vault_takes_priority_over_environment() {
        env::set_var("RESOLVETEST_B_OPENAI_API_KEY", "sk-from-env");
        let resolver = resolver("RESOLVETEST_B_");
        resolver.store().store(CredentialKind::OpenAi, "sk-from-vault");

        assert_eq!(
            resolver.resolve(CredentialKind::OpenAi).unwrap().value,
            "sk-from-vault"
        );
        env::remove_var("RESOLVETEST_B_OPENAI_API_KEY");
    }

    #[test]
    fn test_resolve_from_environment() {
        env::set_var("RESOLVETEST_C_FDC_API_KEY", "fdc-key");
        let resolver = resolver("RESOLVETEST_C_");

        let resolved = resolver.resolve(CredentialKind::NutritionDatabase).unwrap();
        assert_eq!(resolved.value, "fdc-key");
        assert_eq!(resolved.source, "env");
        assert_eq!(resolved.source_detail, "Environment variable $RESOLVETEST_C_FDC_API_KEY");
        env::remove_var("RESOLVETEST_C_FDC_API_KEY");
    }

    #[test]
    fn test_environment_disabled() {
        env::set_var("RESOLVETEST_D_GEMINI_API_KEY", "g-key");
        let mut resolver = resolver("RESOLVETEST_D_");
        resolver.set_check_environment(false);

        assert!(!resolver.check_environment());
        assert!(resolver.resolve(CredentialKind::Gemini).is_none());
        assert_eq!(resolver.list_sources().len(), 1);
        env::remove_var("RESOLVETEST_D_GEMINI_API_KEY");
    }

    #[test]
    fn test_demo_mode_is_not_overridden_by_environment() {
        env::set_var("RESOLVETEST_E_USDA_API_KEY", "usda-key");
        let resolver = resolver("RESOLVETEST_E_");
        resolver
            .store()
            .store(CredentialKind::NutritionDatabase, DEMO_MODE_SENTINEL);

        assert!(resolver.resolve(CredentialKind::NutritionDatabase).is_none());
        assert!(!resolver.is_available(CredentialKind::NutritionDatabase));
        env::remove_var("RESOLVETEST_E_USDA_API_KEY");
    }

    #[test]
    fn test_sources() {
        let resolver = resolver("RESOLVETEST_F_");
        resolver.store().store(CredentialKind::Gemini, "g");

        let sources = resolver.sources();
        assert_eq!(sources.len(), 4);
        assert!(sources.contains(&(CredentialKind::Gemini, Some("memory".to_string()))));
        assert!(sources.contains(&(CredentialKind::OpenAi, None)));
    }
}
