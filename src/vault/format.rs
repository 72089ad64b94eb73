//! Persisted vault entries.
//!
//! A vault is two string entries in the backing `KeyValueStore`:
//!
//! ```text
//! aipad_vault_salt = base64(16 random bytes)
//! aipad_vault_data = base64(12-byte nonce | ciphertext | 16-byte tag)
//! ```
//!
//! The plaintext under the cipher is the JSON array of `Secret` records.
//! There is no version field.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::secret::Secret;
use crate::crypto::kdf::SALT_LEN;
use crate::errors::{Result, VaultError};

/// Store entry holding the base64 salt.
pub const SALT_KEY: &str = "aipad_vault_salt";

/// Store entry holding the base64 encrypted blob.
pub const VAULT_KEY: &str = "aipad_vault_data";

pub fn encode_salt(salt: &[u8; SALT_LEN]) -> String {
    BASE64.encode(salt)
}

pub fn decode_salt(encoded: &str) -> Result<[u8; SALT_LEN]> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| VaultError::InvalidVaultFormat(format!("salt is not base64: {e}")))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        VaultError::InvalidVaultFormat(format!("salt must be {SALT_LEN} bytes, got {len}"))
    })
}

pub fn encode_blob(blob: &[u8]) -> String {
    BASE64.encode(blob)
}

pub fn decode_blob(encoded: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded.trim())
        .map_err(|e| VaultError::InvalidVaultFormat(format!("vault data is not base64: {e}")))
}

/// Serialize the secret list to the plaintext that gets encrypted.
pub fn serialize_secrets(secrets: &[Secret]) -> Result<Vec<u8>> {
    serde_json::to_vec(secrets)
        .map_err(|e| VaultError::SerializationError(format!("secrets: {e}")))
}

/// Parse decrypted plaintext back into the secret list.
pub fn deserialize_secrets(plaintext: &[u8]) -> Result<Vec<Secret>> {
    serde_json::from_slice(plaintext)
        .map_err(|e| VaultError::InvalidVaultFormat(format!("secrets JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salt_of_wrong_length_is_rejected() {
        let encoded = BASE64.encode([0u8; 8]);
        assert!(matches!(
            decode_salt(&encoded),
            Err(VaultError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn salt_survives_encoding() {
        let salt = [7u8; SALT_LEN];
        assert_eq!(decode_salt(&encode_salt(&salt)).unwrap(), salt);
    }

    #[test]
    fn garbage_blob_is_rejected() {
        assert!(decode_blob("***not base64***").is_err());
    }

    #[test]
    fn empty_list_serializes_as_empty_array() {
        assert_eq!(serialize_secrets(&[]).unwrap(), b"[]");
    }

    #[test]
    fn non_json_plaintext_is_invalid_format() {
        assert!(matches!(
            deserialize_secrets(b"\xff\xfe"),
            Err(VaultError::InvalidVaultFormat(_))
        ));
    }
}
