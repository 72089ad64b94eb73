//! JSON-file `KeyValueStore`.
//!
//! The whole store is one JSON object of string entries.  Every write
//! rewrites the file through a temp file + rename in the same directory,
//! so readers never see a half-written store.  Changes are staged on a
//! copy of the entries and only kept once the file write succeeded, so
//! memory and disk never disagree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::KeyValueStore;
use crate::errors::{Result, VaultError};

/// File-backed `KeyValueStore`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.  A missing file is an empty store; the
    /// file and its parent directory are created on the first write.
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let contents = fs::read_to_string(path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| {
                    VaultError::Storage(format!("cannot parse {}: {e}", path.display()))
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Write `staged` to disk, then make it the current state.
    fn commit(&mut self, staged: BTreeMap<String, String>) -> Result<()> {
        self.flush(&staged)?;
        self.entries = staged;
        Ok(())
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| VaultError::SerializationError(format!("store: {e}")))?;

        let parent = self.path.parent().unwrap_or(Path::new("."));
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = parent.join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ));

        fs::write(&tmp_path, &bytes)?;

        // Owner-only read/write on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), entries = entries.len(), "store flushed");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        let mut staged = self.entries.clone();
        for (key, value) in entries {
            staged.insert(key.to_string(), value.to_string());
        }
        self.commit(staged)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut staged = self.entries.clone();
        staged.remove(key);
        self.commit(staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(&dir.path().join("store.json")).unwrap();
        assert!(store.get("anything").unwrap().is_none());
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn remove_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert!(reopened.get("a").unwrap().is_none());
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("a", "1").unwrap();

        assert!(!dir.path().join(".store.json.tmp").exists());
    }

    #[test]
    fn set_many_is_one_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set_many(&[("a", "1"), ("b", "2")]).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn failed_write_keeps_previous_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("a", "1").unwrap();

        // A directory where the temp file goes makes every flush fail.
        fs::create_dir(dir.path().join(".store.json.tmp")).unwrap();

        assert!(store.set("a", "2").is_err());
        assert!(store.set_many(&[("b", "2")]).is_err());
        assert!(store.remove("a").is_err());

        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert!(store.get("b").unwrap().is_none());

        let on_disk = FileStore::open(&path).unwrap();
        assert_eq!(on_disk.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json {{").unwrap();

        assert!(matches!(FileStore::open(&path), Err(VaultError::Storage(_))));
    }

    #[cfg(unix)]
    #[test]
    fn store_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set("a", "1").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
