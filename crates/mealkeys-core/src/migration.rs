//! One-time setup flow that moves API keys into the credential vault
//!
//! The settings screen collects a key per kind and hands them to
//! [`migrate`]. [`import_from`] covers keys that still live somewhere else,
//! typically the shell environment.

use serde::Serialize;

use crate::credentials::{CredentialKind, CredentialStore, CREDENTIAL_ACCOUNT};
use crate::vault::SecretVault;

/// What happened to each kind during a migration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Kinds written to the store
    pub stored: Vec<CredentialKind>,
    /// Kinds left alone (nothing to import, or already configured)
    pub skipped: Vec<CredentialKind>,
    /// Kinds the store refused (empty value or vault failure)
    pub failed: Vec<CredentialKind>,
}

impl MigrationReport {
    /// True when nothing failed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Store every `(kind, value)` pair
///
/// Pairs are written independently; a failure on one kind does not stop
/// the others.
pub fn migrate<'a, I>(store: &CredentialStore, entries: I) -> MigrationReport
where
    I: IntoIterator<Item = (CredentialKind, &'a str)>,
{
    let mut report = MigrationReport::default();
    for (kind, value) in entries {
        if store.store(kind, value) {
            report.stored.push(kind);
        } else {
            report.failed.push(kind);
        }
    }
    tracing::info!(
        stored = report.stored.len(),
        failed = report.failed.len(),
        "credential migration finished"
    );
    report
}

/// Copy credentials found in `source` into `store`
///
/// Kinds with no text value in `source` are skipped. Kinds the store can
/// already retrieve are skipped too, unless `overwrite` is set.
pub fn import_from(
    store: &CredentialStore,
    source: &dyn SecretVault,
    overwrite: bool,
) -> MigrationReport {
    let mut report = MigrationReport::default();

    for kind in CredentialKind::ALL {
        if !overwrite && store.exists(kind) {
            report.skipped.push(kind);
            continue;
        }

        let value = source
            .query(kind.identifier(), CREDENTIAL_ACCOUNT)
            .ok()
            .flatten()
            .and_then(|bytes| String::from_utf8(bytes).ok());

        match value {
            Some(value) if store.store(kind, &value) => report.stored.push(kind),
            Some(_) => report.failed.push(kind),
            None => report.skipped.push(kind),
        }
    }

    tracing::info!(
        source = source.name(),
        stored = report.stored.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "credential import finished"
    );
    report
}
