//! `aipad-vault destroy`: erase the vault and its salt.

use crate::cli::output;
use crate::cli::{confirm, open_session, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `destroy` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let mut session = open_session(cli)?;

    if !session.has_vault()? {
        return Err(VaultError::NotFound("no vault has been created".into()));
    }

    if !force && !confirm("Delete the vault and all its secrets? This cannot be undone")? {
        output::info("Cancelled.");
        return Ok(());
    }

    session.delete_vault()?;
    output::success("Vault deleted");

    Ok(())
}
