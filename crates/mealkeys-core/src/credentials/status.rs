//! Per-kind availability, as rendered by the settings screen's status dots

use serde::Serialize;

use super::kind::CredentialKind;
use super::store::{CredentialStore, Lookup, DEMO_MODE_SENTINEL};

/// Availability of one credential kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialStatus {
    pub kind: CredentialKind,
    /// A usable value is stored (demo mode does not count)
    pub configured: bool,
    /// The nutrition-database record holds the demo sentinel
    pub demo_mode: bool,
    /// The vault could not be read; `configured` is false in that case too
    pub vault_error: Option<String>,
    /// Name of the vault that was consulted
    pub source: String,
}

impl CredentialStore {
    /// Availability of `kind`
    pub fn status(&self, kind: CredentialKind) -> CredentialStatus {
        let lookup = self.lookup(kind);
        let vault_error = match &lookup {
            Lookup::Failed(e) => Some(e.to_string()),
            _ => None,
        };
        let demo_mode = kind.honors_demo_sentinel()
            && matches!(&lookup, Lookup::Found(v) if v == DEMO_MODE_SENTINEL);

        CredentialStatus {
            kind,
            configured: lookup.is_found() && !demo_mode,
            demo_mode,
            vault_error,
            source: self.vault().name().to_string(),
        }
    }

    /// Availability of every kind, in display order
    pub fn status_all(&self) -> Vec<CredentialStatus> {
        CredentialKind::ALL
            .into_iter()
            .map(|kind| self.status(kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::MemoryVault;
    use std::sync::Arc;

    #[test]
    fn test_status_unconfigured() {
        let store = CredentialStore::new(Arc::new(MemoryVault::new()));
        let status = store.status(CredentialKind::Anthropic);

        assert_eq!(status.kind, CredentialKind::Anthropic);
        assert!(!status.configured);
        assert!(!status.demo_mode);
        assert_eq!(status.vault_error, None);
        assert_eq!(status.source, "memory");
    }

    #[test]
    fn test_status_demo_mode() {
        let store = CredentialStore::new(Arc::new(MemoryVault::new()));
        store.store(CredentialKind::NutritionDatabase, DEMO_MODE_SENTINEL);

        let status = store.status(CredentialKind::NutritionDatabase);
        assert!(!status.configured);
        assert!(status.demo_mode);
    }

    #[test]
    fn test_status_all_matches_accessors() {
        let store = CredentialStore::new(Arc::new(MemoryVault::new()));
        store.store(CredentialKind::NutritionDatabase, "abc123");
        store.store(CredentialKind::Gemini, "g");

        let statuses = store.status_all();
        assert_eq!(statuses.len(), CredentialKind::ALL.len());
        for status in statuses {
            assert_eq!(status.configured, store.configured_value(status.kind).is_some());
        }
    }

    #[test]
    fn test_status_serializes_kind_slug() {
        let store = CredentialStore::new(Arc::new(MemoryVault::new()));
        let json = serde_json::to_value(store.status(CredentialKind::OpenAi)).unwrap();
        assert_eq!(json["kind"], "openai");
        assert_eq!(json["configured"], false);
    }
}
