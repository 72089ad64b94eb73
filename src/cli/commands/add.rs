//! `aipad-vault add`: add a secret to the vault.

use std::io::{self, IsTerminal, Read};

use crate::cli::output;
use crate::cli::{open_session, prompt_secret_value, unlock, Cli};
use crate::errors::Result;
use crate::vault::{NewSecret, SecretCategory};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    name: &str,
    value: Option<&str>,
    category: SecretCategory,
    notes: &str,
) -> Result<()> {
    // Determine the secret value from one of three sources.
    let secret_value = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line; it may appear in shell history.");
        v.to_string()
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf.trim_end().to_string()
    } else {
        // Source 3: Interactive secure prompt (default).
        prompt_secret_value(name)?
    };

    let mut session = open_session(cli)?;
    unlock(&mut session)?;

    let id = session.add_secret(NewSecret {
        name: name.to_string(),
        category,
        value: secret_value,
        notes: notes.to_string(),
    })?;
    let total = session.secrets().len();
    session.lock_vault();

    output::success(&format!("Secret '{name}' added ({total} total)"));
    output::tip(&format!("Id: {id}"));

    Ok(())
}
