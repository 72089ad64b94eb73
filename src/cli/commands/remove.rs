//! `aipad-vault remove`: delete a secret from the vault.

use crate::cli::output;
use crate::cli::{confirm, open_session, resolve_secret_id, unlock, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    let mut session = open_session(cli)?;
    unlock(&mut session)?;

    let id = resolve_secret_id(&mut session, id)?;
    let name = session
        .secret(id)
        .map(|s| s.name.clone())
        .ok_or_else(|| VaultError::SecretNotFound(id.to_string()))?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Remove secret '{name}'?"))? {
        session.lock_vault();
        output::info("Cancelled.");
        return Ok(());
    }

    session.remove_secret(id)?;
    session.lock_vault();

    output::success(&format!("Removed secret '{name}'"));

    Ok(())
}
