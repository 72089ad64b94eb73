//! `aipad-vault status`: report whether a vault exists.

use crate::cli::output;
use crate::cli::{open_session, store_path, Cli};
use crate::errors::Result;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let path = store_path(cli)?;
    let session = open_session(cli)?;

    if session.has_vault()? {
        output::info(&format!("Vault present at {}", path.display()));
    } else {
        output::info(&format!("No vault at {}", path.display()));
        output::tip("Run `aipad-vault init` to create one.");
    }

    Ok(())
}
