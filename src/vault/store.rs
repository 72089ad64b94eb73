//! The vault record store.
//!
//! `VaultStore` owns the backing `KeyValueStore` and knows how to turn a
//! passphrase plus the persisted salt into a key, and a secret list into
//! the single encrypted blob.  It holds no unlocked state of its own; that
//! lives in `session::VaultSession`.

use tracing::{debug, info};
use zeroize::Zeroize;

use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::kdf::{derive_key_with_params, generate_salt, Pbkdf2Params, SALT_LEN};
use crate::errors::{Result, VaultError};
use crate::storage::KeyValueStore;

use super::format::{self, SALT_KEY, VAULT_KEY};
use super::secret::Secret;

/// One encrypted vault persisted in a `KeyValueStore`.
pub struct VaultStore<S> {
    storage: S,
    params: Pbkdf2Params,
}

impl<S: KeyValueStore> VaultStore<S> {
    /// Wrap `storage` with the default PBKDF2 parameters.
    pub fn new(storage: S) -> Self {
        Self::with_params(storage, Pbkdf2Params::default())
    }

    pub fn with_params(storage: S, params: Pbkdf2Params) -> Self {
        Self { storage, params }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// `true` iff an encrypted blob is persisted (the salt is not consulted).
    pub fn exists(&self) -> Result<bool> {
        Ok(self.storage.get(VAULT_KEY)?.is_some())
    }

    /// Create a new vault holding `initial_secrets`.
    ///
    /// Fails with `VaultAlreadyExists` if a blob is already persisted;
    /// callers must `delete` first.  An orphaned salt (salt without blob)
    /// is reused rather than regenerated.
    pub fn create(&mut self, initial_secrets: &[Secret], password: &str) -> Result<()> {
        if self.exists()? {
            return Err(VaultError::VaultAlreadyExists);
        }
        self.save(initial_secrets, password)?;
        info!(secrets = initial_secrets.len(), "vault created");
        Ok(())
    }

    /// Decrypt and return the persisted secrets.
    ///
    /// Fails with `NotFound` when no blob or no salt is persisted, and with
    /// `Authentication` when the passphrase is wrong or the blob was altered.
    pub fn load(&self, password: &str) -> Result<Vec<Secret>> {
        let encoded_blob = self
            .storage
            .get(VAULT_KEY)?
            .ok_or_else(|| VaultError::NotFound("no encrypted vault data".into()))?;
        let salt = self
            .load_salt()?
            .ok_or_else(|| VaultError::NotFound("no vault salt".into()))?;

        let blob = format::decode_blob(&encoded_blob)?;
        let key = derive_key_with_params(password.as_bytes(), &salt, &self.params)?;
        let mut plaintext = decrypt(&key, &blob)?;

        let secrets = format::deserialize_secrets(&plaintext);
        plaintext.zeroize();
        let secrets = secrets?;

        debug!(secrets = secrets.len(), "vault decrypted");
        Ok(secrets)
    }

    /// Serialize, encrypt and overwrite the persisted blob.
    ///
    /// Always rewrites the full collection.  Generates and persists the
    /// salt if none exists yet; an existing salt is never replaced here.
    pub fn save(&mut self, secrets: &[Secret], password: &str) -> Result<()> {
        match self.load_salt()? {
            Some(salt) => {
                let blob = self.seal(secrets, password, &salt)?;
                self.storage.set(VAULT_KEY, &format::encode_blob(&blob))?;
                debug!(secrets = secrets.len(), bytes = blob.len(), "vault saved");
            }
            None => {
                let salt = generate_salt()?;
                let blob = self.seal(secrets, password, &salt)?;
                self.write_vault(&salt, &blob)?;
                debug!(secrets = secrets.len(), bytes = blob.len(), "vault saved with new salt");
            }
        }
        Ok(())
    }

    /// Erase both the blob and the salt.
    pub fn delete(&mut self) -> Result<()> {
        self.storage.remove(VAULT_KEY)?;
        self.storage.remove(SALT_KEY)?;
        info!("vault deleted");
        Ok(())
    }

    /// Re-encrypt every secret under `new_password` with a fresh salt.
    ///
    /// The old passphrase must open the vault first and the new one must
    /// differ from it.  Salt and blob are replaced in a single write, so a
    /// failed write leaves the vault openable with the old passphrase.
    /// Returns the number of secrets re-encrypted.
    pub fn change_password(&mut self, old_password: &str, new_password: &str) -> Result<usize> {
        if old_password == new_password {
            return Err(VaultError::PasswordUnchanged);
        }
        let secrets = self.load(old_password)?;

        let new_salt = generate_salt()?;
        let blob = self.seal(&secrets, new_password, &new_salt)?;
        self.write_vault(&new_salt, &blob)?;

        info!(secrets = secrets.len(), "vault password changed");
        Ok(secrets.len())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn load_salt(&self) -> Result<Option<[u8; SALT_LEN]>> {
        self.storage
            .get(SALT_KEY)?
            .map(|encoded| format::decode_salt(&encoded))
            .transpose()
    }

    /// Persist a salt and the blob sealed under it together.
    fn write_vault(&mut self, salt: &[u8; SALT_LEN], blob: &[u8]) -> Result<()> {
        let salt = format::encode_salt(salt);
        let blob = format::encode_blob(blob);
        self.storage
            .set_many(&[(SALT_KEY, salt.as_str()), (VAULT_KEY, blob.as_str())])
    }

    fn seal(&self, secrets: &[Secret], password: &str, salt: &[u8; SALT_LEN]) -> Result<Vec<u8>> {
        let key = derive_key_with_params(password.as_bytes(), salt, &self.params)?;
        let mut plaintext = format::serialize_secrets(secrets)?;
        let blob = encrypt(&key, &plaintext);
        plaintext.zeroize();
        blob
    }
}
