//! Node.js bindings for mealkeys via napi-rs
//!
//! Vault calls can block on an OS unlock prompt, so every store operation
//! runs on tokio's blocking pool and surfaces as a Promise.

#![deny(clippy::all)]

use std::collections::HashMap;

use napi::bindgen_prelude::*;
use napi_derive::napi;

use mealkeys_core::config::{
    init_logging as core_init_logging_from,
    open_store as core_open_store,
    ConfigProvider as CoreConfigProvider,
    FileConfigProvider as CoreFileConfigProvider,
    Settings as CoreSettings,
};
use mealkeys_core::credentials::{
    CredentialKind as CoreCredentialKind,
    CredentialStatus as CoreCredentialStatus,
    CredentialStore as CoreCredentialStore,
};
use mealkeys_core::logging::{self as core_logging, LogLevel as CoreLogLevel};
use mealkeys_core::migration::{
    import_from as core_import_from,
    migrate as core_migrate,
    MigrationReport as CoreMigrationReport,
};
use mealkeys_core::vault::{list_vaults as core_list_vaults, EnvVault as CoreEnvVault};

fn to_napi_error(err: impl std::fmt::Display) -> Error {
    Error::from_reason(err.to_string())
}

fn parse_kind(kind: &str) -> Result<CoreCredentialKind> {
    kind.parse::<CoreCredentialKind>().map_err(to_napi_error)
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(to_napi_error)
}

// ============================================================================
// Plain objects
// ============================================================================

#[napi(object)]
pub struct CredentialStatus {
    pub kind: String,
    pub configured: bool,
    pub demo_mode: bool,
    pub vault_error: Option<String>,
    pub source: String,
}

impl From<CoreCredentialStatus> for CredentialStatus {
    fn from(status: CoreCredentialStatus) -> Self {
        Self {
            kind: status.kind.slug().to_string(),
            configured: status.configured,
            demo_mode: status.demo_mode,
            vault_error: status.vault_error,
            source: status.source,
        }
    }
}

#[napi(object)]
pub struct MigrationReport {
    pub stored: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

fn slugs(kinds: Vec<CoreCredentialKind>) -> Vec<String> {
    kinds.into_iter().map(|k| k.slug().to_string()).collect()
}

impl From<CoreMigrationReport> for MigrationReport {
    fn from(report: CoreMigrationReport) -> Self {
        Self {
            stored: slugs(report.stored),
            skipped: slugs(report.skipped),
            failed: slugs(report.failed),
        }
    }
}

#[napi(object)]
pub struct VaultInfo {
    pub name: String,
    pub description: String,
}

#[napi(object)]
pub struct CredentialKindInfo {
    pub slug: String,
    pub identifier: String,
    pub display_name: String,
}

// ============================================================================
// CredentialStore
// ============================================================================

/// Credential store over a named vault ("keychain", "memory", "env")
#[napi]
pub struct CredentialStore {
    inner: CoreCredentialStore,
}

#[napi]
impl CredentialStore {
    /// Open a store over the named vault (default "keychain")
    #[napi(factory)]
    pub fn open(vault: Option<String>) -> Result<Self> {
        let settings = CoreSettings {
            vault: vault.unwrap_or_else(|| CoreSettings::default().vault),
            ..Default::default()
        };
        let inner = core_open_store(&settings).map_err(to_napi_error)?;
        Ok(Self { inner })
    }

    /// Open a store as configured in a YAML file (default: the user config)
    ///
    /// Also starts file logging at the configured `log_level` unless logging
    /// is already running.
    #[napi(factory)]
    pub fn from_config(path: Option<String>) -> Result<Self> {
        let provider = match path {
            Some(p) => CoreFileConfigProvider::new(p),
            None => CoreFileConfigProvider::user(),
        };
        let settings = provider.load().map_err(to_napi_error)?;
        core_init_logging_from(&settings);
        let inner = core_open_store(&settings).map_err(to_napi_error)?;
        Ok(Self { inner })
    }

    #[napi(getter)]
    pub fn vault(&self) -> String {
        self.inner.vault().name().to_string()
    }

    #[napi]
    pub async fn store(&self, kind: String, value: String) -> Result<bool> {
        let kind = parse_kind(&kind)?;
        let inner = self.inner.clone();
        blocking(move || inner.store(kind, &value)).await
    }

    #[napi]
    pub async fn retrieve(&self, kind: String) -> Result<Option<String>> {
        let kind = parse_kind(&kind)?;
        let inner = self.inner.clone();
        blocking(move || inner.retrieve(kind)).await
    }

    #[napi]
    pub async fn exists(&self, kind: String) -> Result<bool> {
        let kind = parse_kind(&kind)?;
        let inner = self.inner.clone();
        blocking(move || inner.exists(kind)).await
    }

    #[napi]
    pub async fn nutrition_database_key(&self) -> Result<Option<String>> {
        let inner = self.inner.clone();
        blocking(move || inner.nutrition_database_key()).await
    }

    #[napi]
    pub async fn assistant_key(&self, kind: String) -> Result<Option<String>> {
        let kind = parse_kind(&kind)?;
        if !kind.is_assistant() {
            return Err(Error::from_reason(format!("{} is not an assistant provider", kind)));
        }
        let inner = self.inner.clone();
        blocking(move || inner.assistant_key(kind)).await
    }

    #[napi]
    pub async fn is_demo_mode(&self) -> Result<bool> {
        let inner = self.inner.clone();
        blocking(move || inner.is_demo_mode()).await
    }

    #[napi]
    pub async fn status(&self, kind: String) -> Result<CredentialStatus> {
        let kind = parse_kind(&kind)?;
        let inner = self.inner.clone();
        blocking(move || inner.status(kind).into()).await
    }

    #[napi]
    pub async fn status_all(&self) -> Result<Vec<CredentialStatus>> {
        let inner = self.inner.clone();
        blocking(move || inner.status_all().into_iter().map(Into::into).collect()).await
    }

    /// Store every `{ kind: value }` pair from the setup screen
    #[napi]
    pub async fn migrate(&self, entries: HashMap<String, String>) -> Result<MigrationReport> {
        let parsed = entries
            .into_iter()
            .map(|(kind, value)| Ok((parse_kind(&kind)?, value)))
            .collect::<Result<Vec<_>>>()?;
        let inner = self.inner.clone();
        blocking(move || {
            core_migrate(&inner, parsed.iter().map(|(k, v)| (*k, v.as_str()))).into()
        })
        .await
    }

    /// Copy keys found in environment variables into the vault
    #[napi]
    pub async fn import_from_environment(
        &self,
        prefix: Option<String>,
        overwrite: Option<bool>,
    ) -> Result<MigrationReport> {
        let source = match prefix {
            Some(p) => CoreEnvVault::with_prefix(p),
            None => CoreEnvVault::new(),
        };
        let inner = self.inner.clone();
        blocking(move || core_import_from(&inner, &source, overwrite.unwrap_or(false)).into()).await
    }
}

// ============================================================================
// Registry & Logging Functions
// ============================================================================

#[napi]
pub fn list_vaults() -> Vec<VaultInfo> {
    core_list_vaults()
        .into_iter()
        .map(|(name, description)| VaultInfo { name, description })
        .collect()
}

#[napi]
pub fn list_credential_kinds() -> Vec<CredentialKindInfo> {
    CoreCredentialKind::ALL
        .iter()
        .map(|kind| CredentialKindInfo {
            slug: kind.slug().to_string(),
            identifier: kind.identifier().to_string(),
            display_name: kind.display_name().to_string(),
        })
        .collect()
}

/// Start writing logs to the temp-dir log file
#[napi]
pub fn init_logging(level: Option<String>) -> Result<bool> {
    let level = match level {
        Some(l) => l.parse::<CoreLogLevel>().map_err(to_napi_error)?,
        None => CoreLogLevel::Info,
    };
    Ok(core_logging::init(level))
}

#[napi]
pub fn log_file_path() -> String {
    core_logging::log_file_path().to_string_lossy().into_owned()
}

/// Truncate the log file
#[napi]
pub fn clear_log() -> Result<()> {
    core_logging::clear_log().map_err(to_napi_error)
}
