use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{Pbkdf2Params, MIN_ITERATIONS};
use crate::errors::{Result, VaultError};

/// Project-level configuration, loaded from `.aipad.toml`.
///
/// Every field has a sensible default so the vault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding the store file.
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Name of the JSON store file inside `store_dir`.
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// PBKDF2 iteration count (default: 600 000, never lower).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_store_dir() -> String {
    ".aipad".to_string()
}

fn default_store_file() -> String {
    "vault.json".to_string()
}

fn default_pbkdf2_iterations() -> u32 {
    MIN_ITERATIONS
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            store_file: default_store_file(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".aipad.toml";

    /// Load settings from `<project_dir>/.aipad.toml`.
    ///
    /// If the file does not exist, defaults are returned.  A file that
    /// cannot be parsed, or that asks for fewer than the minimum PBKDF2
    /// iterations, is an error.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.pbkdf2_iterations < MIN_ITERATIONS {
            return Err(VaultError::ConfigError(format!(
                "pbkdf2_iterations must be at least {MIN_ITERATIONS} (got {})",
                settings.pbkdf2_iterations
            )));
        }

        Ok(settings)
    }

    /// Full path to the store file, e.g. `project_dir/.aipad/vault.json`.
    pub fn store_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.store_dir).join(&self.store_file)
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn pbkdf2_params(&self) -> Pbkdf2Params {
        Pbkdf2Params {
            iterations: self.pbkdf2_iterations,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
