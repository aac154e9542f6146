//! mealkeys core
//!
//! Keeps the meal planner's third-party API keys (nutrition database and AI
//! assistant providers) in the operating system's credential vault instead
//! of in source code or plain config files.
//! This crate is runtime agnostic and is wrapped for Node.js (napi-rs) and
//! Python (PyO3).
//!
//! ## Credential store
//!
//! ```rust
//! use std::sync::Arc;
//! use mealkeys_core::{CredentialKind, CredentialStore, MemoryVault};
//!
//! // Production code uses CredentialStore::keychain()
//! let store = CredentialStore::new(Arc::new(MemoryVault::new()));
//!
//! assert!(store.store(CredentialKind::NutritionDatabase, "abc123"));
//! assert!(store.exists(CredentialKind::NutritionDatabase));
//! assert_eq!(store.nutrition_database_key().as_deref(), Some("abc123"));
//! assert!(!store.is_demo_mode());
//!
//! assert!(!store.exists(CredentialKind::Anthropic));
//! ```

pub mod vault;
pub mod credentials;
pub mod resolver;
pub mod migration;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use vault::{
    SecretVault, VaultError, VaultResult,
    KeychainVault, MemoryVault, EnvVault,
    register_vault, create_vault, list_vaults,
};

pub use credentials::{
    CredentialKind, CredentialStore, CredentialStatus, Lookup, UnknownKind,
    DEMO_MODE_SENTINEL,
};

pub use resolver::{CredentialResolver, ResolvedCredential};

pub use migration::{migrate, import_from, MigrationReport};

pub use config::{
    ConfigProvider, ConfigError, ConfigResult, Settings,
    FileConfigProvider, MemoryConfigProvider, open_store, open_resolver,
};

pub use logging::LogLevel;
