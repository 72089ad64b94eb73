//! Vault module: encrypted secret storage.
//!
//! This module provides:
//! - `Secret`, `NewSecret`, `SecretPatch` and `SecretCategory` (`secret`)
//! - Persisted entry names and encodings (`format`)
//! - `VaultStore` for creating, loading, saving and deleting the vault (`store`)

pub mod format;
pub mod secret;
pub mod store;

// Re-export the most commonly used items.
pub use secret::{NewSecret, Secret, SecretCategory, SecretPatch};
pub use store::VaultStore;
