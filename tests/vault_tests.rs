//! Integration tests for the vault record store.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use tempfile::TempDir;

use aipad_vault::errors::{Result, VaultError};
use aipad_vault::storage::{FileStore, KeyValueStore, MemoryStore};
use aipad_vault::vault::format::{SALT_KEY, VAULT_KEY};
use aipad_vault::vault::{NewSecret, Secret, SecretCategory, VaultStore};

fn secret(name: &str) -> Secret {
    NewSecret {
        name: name.into(),
        category: SecretCategory::ApiKey,
        value: format!("{name}-value"),
        notes: String::new(),
    }
    .into_secret(Utc::now())
    .unwrap()
}

fn memory_vault() -> VaultStore<MemoryStore> {
    VaultStore::new(MemoryStore::new())
}

/// A store whose writes to the blob entry fail once `fail_blob_writes`
/// is set.  Multi-entry writes are all-or-nothing, like `FileStore`.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_blob_writes: bool,
}

impl FlakyStore {
    fn check(&self, key: &str) -> Result<()> {
        if self.fail_blob_writes && key == VAULT_KEY {
            return Err(VaultError::Storage("disk full".into()));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, _) in entries {
            self.check(key)?;
        }
        self.inner.set_many(entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

// ---------------------------------------------------------------------------
// Create and load
// ---------------------------------------------------------------------------

#[test]
fn create_then_load_returns_same_secrets() {
    let mut vault = memory_vault();
    let secrets = vec![secret("GitHub"), secret("AWS")];

    assert!(!vault.exists().unwrap());
    vault.create(&secrets, "hunter2").expect("create");
    assert!(vault.exists().unwrap());

    let loaded = vault.load("hunter2").expect("load");
    assert_eq!(loaded, secrets);
}

#[test]
fn empty_vault_roundtrip() {
    let mut vault = memory_vault();
    vault.create(&[], "hunter2").unwrap();
    assert!(vault.load("hunter2").unwrap().is_empty());
}

#[test]
fn wrong_password_is_authentication_error() {
    let mut vault = memory_vault();
    vault.create(&[secret("GitHub")], "correct-password").unwrap();

    let result = vault.load("wrong-password");
    assert!(matches!(result, Err(VaultError::Authentication)));
}

#[test]
fn load_without_vault_is_not_found() {
    let vault = memory_vault();
    assert!(matches!(vault.load("pw"), Err(VaultError::NotFound(_))));
}

#[test]
fn load_with_blob_but_no_salt_is_not_found() {
    let mut vault = memory_vault();
    vault.create(&[], "pw").unwrap();
    vault.storage_mut().remove(SALT_KEY).unwrap();

    assert!(vault.exists().unwrap(), "exists ignores the salt");
    assert!(matches!(vault.load("pw"), Err(VaultError::NotFound(_))));
}

#[test]
fn create_twice_is_rejected() {
    let mut vault = memory_vault();
    vault.create(&[secret("first")], "pw").unwrap();

    let result = vault.create(&[], "pw");
    assert!(matches!(result, Err(VaultError::VaultAlreadyExists)));

    // The first vault is untouched.
    assert_eq!(vault.load("pw").unwrap().len(), 1);
}

#[test]
fn delete_then_create_starts_over() {
    let mut vault = memory_vault();
    vault.create(&[secret("old")], "old-pw").unwrap();

    vault.delete().unwrap();
    assert!(!vault.exists().unwrap());
    assert!(vault.storage().is_empty(), "blob and salt both removed");

    vault.create(&[], "new-pw").unwrap();
    assert!(vault.load("new-pw").unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Salt handling
// ---------------------------------------------------------------------------

#[test]
fn salt_is_sixteen_bytes_and_never_regenerated_by_save() {
    let mut vault = memory_vault();
    vault.create(&[], "pw").unwrap();
    let salt = vault.storage().get(SALT_KEY).unwrap().unwrap();
    assert_eq!(BASE64.decode(&salt).unwrap().len(), 16);

    vault.save(&[secret("a")], "pw").unwrap();
    vault.save(&[secret("a"), secret("b")], "pw").unwrap();

    assert_eq!(vault.storage().get(SALT_KEY).unwrap().unwrap(), salt);
}

#[test]
fn orphaned_salt_is_reused_on_create() {
    let mut vault = memory_vault();
    vault.create(&[], "pw").unwrap();
    let salt = vault.storage().get(SALT_KEY).unwrap().unwrap();

    vault.storage_mut().remove(VAULT_KEY).unwrap();
    vault.create(&[], "pw").unwrap();

    assert_eq!(vault.storage().get(SALT_KEY).unwrap().unwrap(), salt);
}

// ---------------------------------------------------------------------------
// Integrity
// ---------------------------------------------------------------------------

#[test]
fn flipped_blob_byte_is_rejected() {
    let mut vault = memory_vault();
    vault.create(&[secret("GitHub")], "p").unwrap();

    let encoded = vault.storage().get(VAULT_KEY).unwrap().unwrap();
    let mut blob = BASE64.decode(encoded).unwrap();
    let mid = blob.len() / 2;
    blob[mid] ^= 0x01;
    vault
        .storage_mut()
        .set(VAULT_KEY, &BASE64.encode(&blob))
        .unwrap();

    assert!(matches!(vault.load("p"), Err(VaultError::Authentication)));
}

#[test]
fn non_base64_blob_is_invalid_format() {
    let mut vault = memory_vault();
    vault.create(&[], "p").unwrap();
    vault.storage_mut().set(VAULT_KEY, "%%%").unwrap();

    assert!(matches!(
        vault.load("p"),
        Err(VaultError::InvalidVaultFormat(_))
    ));
}

#[test]
fn every_save_uses_a_fresh_nonce() {
    let mut vault = memory_vault();
    vault.create(&[], "p").unwrap();

    let mut nonces = HashSet::new();
    for _ in 0..20 {
        vault.save(&[], "p").unwrap();
        let blob = BASE64
            .decode(vault.storage().get(VAULT_KEY).unwrap().unwrap())
            .unwrap();
        assert!(nonces.insert(blob[..12].to_vec()), "nonce reused");
    }
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

#[test]
fn change_password_re_encrypts_with_new_salt() {
    let mut vault = memory_vault();
    vault.create(&[secret("a"), secret("b")], "old-password").unwrap();
    let old_salt = vault.storage().get(SALT_KEY).unwrap().unwrap();

    let count = vault.change_password("old-password", "new-password").unwrap();
    assert_eq!(count, 2);

    assert_ne!(vault.storage().get(SALT_KEY).unwrap().unwrap(), old_salt);
    assert!(vault.load("old-password").is_err());
    assert_eq!(vault.load("new-password").unwrap().len(), 2);
}

#[test]
fn change_password_with_wrong_old_password_changes_nothing() {
    let mut vault = memory_vault();
    vault.create(&[secret("a")], "old-password").unwrap();

    let result = vault.change_password("guess", "new-password");
    assert!(matches!(result, Err(VaultError::Authentication)));
    assert_eq!(vault.load("old-password").unwrap().len(), 1);
}

#[test]
fn change_password_to_same_password_is_rejected() {
    let mut vault = memory_vault();
    vault.create(&[secret("a")], "old-password").unwrap();
    let salt = vault.storage().get(SALT_KEY).unwrap().unwrap();

    let result = vault.change_password("old-password", "old-password");
    assert!(matches!(result, Err(VaultError::PasswordUnchanged)));
    assert_eq!(vault.storage().get(SALT_KEY).unwrap().unwrap(), salt);
}

#[test]
fn failed_password_change_keeps_old_password_working() {
    let mut vault = VaultStore::new(FlakyStore::default());
    vault.create(&[secret("a")], "old-password").unwrap();
    let salt = vault.storage().get(SALT_KEY).unwrap().unwrap();

    vault.storage_mut().fail_blob_writes = true;
    let result = vault.change_password("old-password", "new-password");
    assert!(matches!(result, Err(VaultError::Storage(_))));

    // Salt and blob still belong together.
    assert_eq!(vault.storage().get(SALT_KEY).unwrap().unwrap(), salt);
    assert_eq!(vault.load("old-password").unwrap().len(), 1);
    assert!(vault.load("new-password").is_err());
}

#[test]
fn failed_first_save_leaves_no_orphaned_salt() {
    let mut vault = VaultStore::new(FlakyStore {
        fail_blob_writes: true,
        ..FlakyStore::default()
    });

    assert!(vault.create(&[], "pw").is_err());
    assert!(vault.storage().get(SALT_KEY).unwrap().is_none());
    assert!(!vault.exists().unwrap());
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

#[test]
fn file_backed_vault_survives_reopen() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join(".aipad").join("vault.json");

    let mut vault = VaultStore::new(FileStore::open(&path).unwrap());
    vault.create(&[secret("GitHub")], "hunter2").unwrap();
    drop(vault);

    let reopened = VaultStore::new(FileStore::open(&path).unwrap());
    assert!(reopened.exists().unwrap());
    let loaded = reopened.load("hunter2").unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "GitHub");
}

#[test]
fn file_never_contains_plaintext() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("vault.json");

    let mut vault = VaultStore::new(FileStore::open(&path).unwrap());
    vault.create(&[secret("GitHub")], "hunter2").unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains(SALT_KEY));
    assert!(raw.contains(VAULT_KEY));
    assert!(!raw.contains("GitHub"));
    assert!(!raw.contains("GitHub-value"));
}
