//! Secret vault abstractions and implementations
//!
//! This module provides the injected storage capability behind the
//! credential store:
//! - `SecretVault` trait with `add`/`delete`/`query`/`replace`
//! - Built-in implementations: `KeychainVault`, `MemoryVault`, `EnvVault`
//! - A registry for creating vaults by name

mod traits;
mod keychain_vault;
mod memory_vault;
mod env_vault;
mod registry;

pub use traits::{SecretVault, VaultError, VaultResult};
pub use keychain_vault::KeychainVault;
pub use memory_vault::MemoryVault;
pub use env_vault::EnvVault;
pub use registry::{
    register_vault, create_vault, list_vaults, has_vault, unregister_vault,
    VaultDefinition, VaultFactory,
};
