//! Credential kinds and the store that keeps them in a secret vault

mod kind;
mod store;
mod status;

pub use kind::{CredentialKind, UnknownKind, IDENTIFIER_PREFIX};
pub use store::{CredentialStore, Lookup, CREDENTIAL_ACCOUNT, DEMO_MODE_SENTINEL};
pub use status::CredentialStatus;
