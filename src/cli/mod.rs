//! CLI module: the Clap argument parser and the shared command helpers.

pub mod commands;
pub mod input;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::session::{Clock, VaultSession};
use crate::storage::{FileStore, KeyValueStore};
use crate::vault::{SecretCategory, VaultStore};

/// Minimum length for a newly chosen passphrase.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable that supplies the passphrase non-interactively.
pub const PASSWORD_ENV: &str = "AIPAD_VAULT_PASSWORD";

/// Environment variable that supplies the replacement passphrase for `passwd`.
pub const NEW_PASSWORD_ENV: &str = "AIPAD_VAULT_NEW_PASSWORD";

/// AIPad vault CLI: encrypted local secret vault.
#[derive(Parser)]
#[command(
    name = "aipad-vault",
    about = "Encrypted local secret vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory (default: from .aipad.toml, else .aipad)
    #[arg(long, global = true)]
    pub store_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty vault
    Init {
        /// Delete an existing vault first (its secrets are lost)
        #[arg(long)]
        force: bool,
    },

    /// Show whether a vault exists
    Status,

    /// Add a secret
    Add {
        /// Display name (e.g. GitHub)
        name: String,
        /// Secret value (omit for interactive prompt)
        value: Option<String>,
        /// Category: api_key, password, ssh_key, note, custom
        #[arg(short, long, default_value = "password")]
        category: SecretCategory,
        /// Free-text notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// Update fields of an existing secret
    Update {
        /// Secret id (or a unique prefix of it)
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<SecretCategory>,
        /// New value (use --prompt-value to enter it securely)
        #[arg(long)]
        value: Option<String>,
        /// Prompt for the new value
        #[arg(long, conflicts_with = "value")]
        prompt_value: bool,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove a secret
    Remove {
        /// Secret id (or a unique prefix of it)
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List secrets (values are never shown)
    List {
        /// Only show secrets whose name, category or notes contain this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Print a secret's value
    Get {
        /// Secret id (or a unique prefix of it)
        id: String,
    },

    /// Change the vault passphrase
    Passwd,

    /// Delete the vault and its salt
    Destroy {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Keep the vault unlocked in an interactive shell (auto-locks when idle)
    Shell,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the vault passphrase from `AIPAD_VAULT_PASSWORD` or a prompt.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation.
///
/// `env_var` is consulted first for scripted usage: `init` reads
/// `AIPAD_VAULT_PASSWORD`, a password change reads
/// `AIPAD_VAULT_NEW_PASSWORD`.  Enforces a minimum length.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(env_var) {
        if !pw.is_empty() {
            if pw.len() < MIN_PASSWORD_LEN {
                return Err(VaultError::CommandFailed(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose vault password")
            .with_confirmation(
                "Confirm vault password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Prompt for a secret value without echoing it.
pub fn prompt_secret_value(name: &str) -> Result<String> {
    dialoguer::Password::new()
        .with_prompt(format!("Enter value for {name}"))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Load `.aipad.toml` from the working directory and apply CLI overrides.
fn load_settings(cli: &Cli) -> Result<(PathBuf, Settings)> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;
    if let Some(ref dir) = cli.store_dir {
        settings.store_dir = dir.clone();
    }
    Ok((cwd, settings))
}

/// Resolve the store file path from the CLI arguments and `.aipad.toml`.
///
/// Example: `<cwd>/.aipad/vault.json`
pub fn store_path(cli: &Cli) -> Result<PathBuf> {
    let (cwd, settings) = load_settings(cli)?;
    Ok(settings.store_path(&cwd))
}

/// Open a locked session over the configured file store.
pub fn open_session(cli: &Cli) -> Result<VaultSession<FileStore>> {
    let (cwd, settings) = load_settings(cli)?;
    let storage = FileStore::open(&settings.store_path(&cwd))?;
    Ok(VaultSession::new(VaultStore::with_params(
        storage,
        settings.pbkdf2_params(),
    )))
}

/// Prompt for the passphrase and unlock `session`.
///
/// A missing vault is reported as such; every other failure is the
/// generic "invalid password or corrupted data".
pub fn unlock<S: KeyValueStore, C: Clock>(session: &mut VaultSession<S, C>) -> Result<()> {
    if !session.has_vault()? {
        output::tip("Run `aipad-vault init` to create a vault.");
        return Err(VaultError::NotFound("no vault has been created".into()));
    }
    let password = prompt_password()?;
    if session.unlock_vault(&password) {
        Ok(())
    } else {
        Err(VaultError::Authentication)
    }
}

/// Find the secret whose id equals `needle` or starts with it.
///
/// A prefix must match exactly one secret.
pub fn resolve_secret_id<S: KeyValueStore, C: Clock>(
    session: &mut VaultSession<S, C>,
    needle: &str,
) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(needle) {
        return Ok(id);
    }

    let needle = needle.to_ascii_lowercase();
    if needle.is_empty() {
        return Err(VaultError::SecretNotFound(needle));
    }
    let matches: Vec<Uuid> = session
        .secrets()
        .iter()
        .filter(|s| s.id.to_string().starts_with(&needle))
        .map(|s| s.id)
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(VaultError::SecretNotFound(needle)),
        _ => Err(VaultError::CommandFailed(format!(
            "id prefix '{needle}' matches {} secrets; use more characters",
            matches.len()
        ))),
    }
}
