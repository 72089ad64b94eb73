//! `aipad-vault init`: create a new, empty vault.

use crate::cli::output;
use crate::cli::{open_session, prompt_new_password, store_path, Cli, PASSWORD_ENV};
use crate::errors::{Result, VaultError};

/// Execute the `init` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let path = store_path(cli)?;
    let mut session = open_session(cli)?;

    // 1. An existing vault is only replaced when asked to.
    let replace = session.has_vault()?;
    if replace && !force {
        output::tip("Use `aipad-vault init --force` to delete it and start over.");
        return Err(VaultError::VaultAlreadyExists);
    }

    // 2. Choose a passphrase before anything is deleted.
    let password = prompt_new_password(PASSWORD_ENV)?;
    if replace {
        session.delete_vault()?;
        output::warning("Existing vault deleted.");
    }

    // 3. Create the empty vault.
    session.create_vault(&password)?;
    session.lock_vault();

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `aipad-vault add <NAME>` to add a secret.");
    output::tip("Run `aipad-vault shell` to keep the vault unlocked while you work.");

    Ok(())
}
