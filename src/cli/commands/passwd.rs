//! `aipad-vault passwd`: change the vault passphrase.
//!
//! Decrypts with the current passphrase, generates a new salt, and
//! re-encrypts every secret under the new passphrase.  Scripts pass the
//! current passphrase in `AIPAD_VAULT_PASSWORD` and the new one in
//! `AIPAD_VAULT_NEW_PASSWORD`.

use crate::cli::output;
use crate::cli::{open_session, prompt_new_password, unlock, Cli, NEW_PASSWORD_ENV};
use crate::errors::Result;

/// Execute the `passwd` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut session = open_session(cli)?;

    output::info("Enter your current vault password.");
    unlock(&mut session)?;

    output::info("Choose your new vault password.");
    let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;
    let count = session.change_password(&new_password)?;
    session.lock_vault();

    output::success(&format!("Password changed ({count} secrets re-encrypted)"));

    Ok(())
}
