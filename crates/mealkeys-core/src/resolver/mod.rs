//! Read-side credential resolution
//!
//! A single entry point for code that needs a usable API key and does not
//! care whether it came from the vault or the environment.

mod credential_resolver;

pub use credential_resolver::{CredentialResolver, ResolvedCredential};
