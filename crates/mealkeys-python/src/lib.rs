//! Python bindings for mealkeys via PyO3

use std::collections::HashMap;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

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

fn parse_kind(kind: &str) -> PyResult<CoreCredentialKind> {
    kind.parse::<CoreCredentialKind>()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

// ============================================================================
// Result Types
// ============================================================================

#[pyclass]
#[derive(Clone)]
pub struct CredentialStatus {
    #[pyo3(get)]
    pub kind: String,
    #[pyo3(get)]
    pub configured: bool,
    #[pyo3(get)]
    pub demo_mode: bool,
    #[pyo3(get)]
    pub vault_error: Option<String>,
    #[pyo3(get)]
    pub source: String,
}

#[pymethods]
impl CredentialStatus {
    fn __repr__(&self) -> String {
        format!(
            "CredentialStatus(kind='{}', configured={}, demo_mode={}, source='{}')",
            self.kind, self.configured, self.demo_mode, self.source
        )
    }
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

#[pyclass]
#[derive(Clone)]
pub struct MigrationReport {
    #[pyo3(get)]
    pub stored: Vec<String>,
    #[pyo3(get)]
    pub skipped: Vec<String>,
    #[pyo3(get)]
    pub failed: Vec<String>,
}

#[pymethods]
impl MigrationReport {
    fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn __repr__(&self) -> String {
        format!(
            "MigrationReport(stored={:?}, skipped={:?}, failed={:?})",
            self.stored, self.skipped, self.failed
        )
    }
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

// ============================================================================
// CredentialStore
// ============================================================================

#[pyclass]
pub struct CredentialStore {
    inner: CoreCredentialStore,
}

#[pymethods]
impl CredentialStore {
    /// Open a store over the named vault (default "keychain")
    #[new]
    #[pyo3(signature = (vault=None))]
    pub fn new(vault: Option<String>) -> PyResult<Self> {
        let settings = CoreSettings {
            vault: vault.unwrap_or_else(|| CoreSettings::default().vault),
            ..Default::default()
        };
        let inner = core_open_store(&settings).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Open a store as configured in a YAML file (default: the user config)
    ///
    /// Also starts file logging at the configured `log_level` unless logging
    /// is already running.
    #[staticmethod]
    #[pyo3(signature = (path=None))]
    pub fn from_config(path: Option<String>) -> PyResult<Self> {
        let provider = match path {
            Some(p) => CoreFileConfigProvider::new(p),
            None => CoreFileConfigProvider::user(),
        };
        let settings = provider.load().map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        core_init_logging_from(&settings);
        let inner = core_open_store(&settings).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    #[getter]
    pub fn vault(&self) -> String {
        self.inner.vault().name().to_string()
    }

    // Vault calls can block on an OS unlock prompt, so they run with the
    // GIL released

    pub fn store(&self, py: Python<'_>, kind: &str, value: &str) -> PyResult<bool> {
        let kind = parse_kind(kind)?;
        Ok(py.allow_threads(|| self.inner.store(kind, value)))
    }

    pub fn retrieve(&self, py: Python<'_>, kind: &str) -> PyResult<Option<String>> {
        let kind = parse_kind(kind)?;
        Ok(py.allow_threads(|| self.inner.retrieve(kind)))
    }

    pub fn exists(&self, py: Python<'_>, kind: &str) -> PyResult<bool> {
        let kind = parse_kind(kind)?;
        Ok(py.allow_threads(|| self.inner.exists(kind)))
    }

    pub fn nutrition_database_key(&self, py: Python<'_>) -> Option<String> {
        py.allow_threads(|| self.inner.nutrition_database_key())
    }

    pub fn assistant_key(&self, py: Python<'_>, kind: &str) -> PyResult<Option<String>> {
        let kind = parse_kind(kind)?;
        if !kind.is_assistant() {
            return Err(PyValueError::new_err(format!("{} is not an assistant provider", kind)));
        }
        Ok(py.allow_threads(|| self.inner.assistant_key(kind)))
    }

    pub fn is_demo_mode(&self, py: Python<'_>) -> bool {
        py.allow_threads(|| self.inner.is_demo_mode())
    }

    pub fn status(&self, py: Python<'_>, kind: &str) -> PyResult<CredentialStatus> {
        let kind = parse_kind(kind)?;
        Ok(py.allow_threads(|| self.inner.status(kind)).into())
    }

    pub fn status_all(&self, py: Python<'_>) -> Vec<CredentialStatus> {
        py.allow_threads(|| self.inner.status_all())
            .into_iter()
            .map(Into::into)
            .collect()
    }

    /// Store every `{kind: value}` pair from a setup script
    pub fn migrate(&self, py: Python<'_>, entries: HashMap<String, String>) -> PyResult<MigrationReport> {
        let parsed = entries
            .iter()
            .map(|(kind, value)| Ok((parse_kind(kind)?, value.as_str())))
            .collect::<PyResult<Vec<_>>>()?;
        Ok(py.allow_threads(|| core_migrate(&self.inner, parsed)).into())
    }

    /// Copy keys found in environment variables into the vault
    #[pyo3(signature = (prefix=None, overwrite=false))]
    pub fn import_from_environment(
        &self,
        py: Python<'_>,
        prefix: Option<String>,
        overwrite: bool,
    ) -> MigrationReport {
        let source = match prefix {
            Some(p) => CoreEnvVault::with_prefix(p),
            None => CoreEnvVault::new(),
        };
        py.allow_threads(|| core_import_from(&self.inner, &source, overwrite))
            .into()
    }

    fn __repr__(&self) -> String {
        format!("CredentialStore(vault='{}')", self.inner.vault().name())
    }
}

// ============================================================================
// Functions
// ============================================================================

/// List registered vaults as (name, description) tuples
#[pyfunction]
fn list_vaults() -> Vec<(String, String)> {
    core_list_vaults()
}

/// List credential kind slugs
#[pyfunction]
fn list_credential_kinds() -> Vec<String> {
    CoreCredentialKind::ALL
        .iter()
        .map(|k| k.slug().to_string())
        .collect()
}

#[pyfunction]
#[pyo3(signature = (level=None))]
fn init_logging(level: Option<&str>) -> PyResult<bool> {
    let level = match level {
        Some(l) => l.parse::<CoreLogLevel>().map_err(PyValueError::new_err)?,
        None => CoreLogLevel::Info,
    };
    Ok(core_logging::init(level))
}

#[pyfunction]
fn log_file_path() -> String {
    core_logging::log_file_path().to_string_lossy().into_owned()
}

/// Truncate the log file
#[pyfunction]
fn clear_log() -> PyResult<()> {
    core_logging::clear_log().map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

// ============================================================================
// Module Definition
// ============================================================================

#[pymodule]
fn mealkeys(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<CredentialStore>()?;
    m.add_class::<CredentialStatus>()?;
    m.add_class::<MigrationReport>()?;

    m.add_function(wrap_pyfunction!(list_vaults, m)?)?;
    m.add_function(wrap_pyfunction!(list_credential_kinds, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    m.add_function(wrap_pyfunction!(log_file_path, m)?)?;
    m.add_function(wrap_pyfunction!(clear_log, m)?)?;

    Ok(())
}
