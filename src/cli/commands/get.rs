//! `aipad-vault get`: print a single secret's value.

use crate::cli::{open_session, resolve_secret_id, unlock, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `get` command.
pub fn execute(cli: &Cli, id: &str) -> Result<()> {
    let mut session = open_session(cli)?;
    unlock(&mut session)?;

    let id = resolve_secret_id(&mut session, id)?;
    let secret = session
        .secret(id)
        .ok_or_else(|| VaultError::SecretNotFound(id.to_string()))?;
    println!("{}", secret.value);

    session.lock_vault();
    Ok(())
}
