//! `aipad-vault list`: display secrets in a table.

use crate::cli::output;
use crate::cli::{open_session, unlock, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, search: Option<&str>) -> Result<()> {
    let mut session = open_session(cli)?;
    unlock(&mut session)?;

    let total = session.secrets().len();
    let shown = session.filtered_secrets(search.unwrap_or(""));

    match search {
        Some(q) => output::info(&format!("{} of {total} secret(s) match '{q}'", shown.len())),
        None => output::info(&format!("{total} secret(s)")),
    }
    output::print_secrets_table(&shown, search);

    session.lock_vault();
    Ok(())
}
