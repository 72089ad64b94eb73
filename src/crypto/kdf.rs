//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The same passphrase and salt always produce the same key, which is how
//! a vault re-opens across restarts.  The iteration count is configurable
//! upward through `Pbkdf2Params` but never below `MIN_ITERATIONS`.

use hmac::Hmac;
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use super::keys::{VaultKey, KEY_LEN};
use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Lowest iteration count we are willing to derive with.
pub const MIN_ITERATIONS: u32 = 600_000;

/// Tunable PBKDF2 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbkdf2Params {
    /// Number of HMAC-SHA256 rounds (default: 600 000).
    pub iterations: u32,
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self {
            iterations: MIN_ITERATIONS,
        }
    }
}

/// Derive the vault key with the default parameters.
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> Result<VaultKey> {
    derive_key_with_params(password, salt, &Pbkdf2Params::default())
}

/// Derive the vault key with explicit PBKDF2 parameters.
///
/// Refuses iteration counts below `MIN_ITERATIONS` and empty passphrases.
pub fn derive_key_with_params(
    password: &[u8],
    salt: &[u8; SALT_LEN],
    params: &Pbkdf2Params,
) -> Result<VaultKey> {
    if params.iterations < MIN_ITERATIONS {
        return Err(VaultError::KeyDerivationFailed(format!(
            "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
            params.iterations
        )));
    }
    if password.is_empty() {
        return Err(VaultError::KeyDerivationFailed(
            "passphrase cannot be empty".into(),
        ));
    }

    let mut bytes = [0u8; KEY_LEN];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, params.iterations, &mut bytes)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("PBKDF2 failed: {e}")))?;

    let key = VaultKey::new(bytes);
    bytes.zeroize();
    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| VaultError::ProviderUnavailable(format!("OS random source: {e}")))?;
    Ok(salt)
}
