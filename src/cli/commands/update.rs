//! `aipad-vault update`: change fields of an existing secret.

use crate::cli::output;
use crate::cli::{open_session, prompt_secret_value, resolve_secret_id, unlock, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::SecretPatch;

/// Execute the `update` command.
pub fn execute(cli: &Cli, id: &str, mut patch: SecretPatch, prompt_value: bool) -> Result<()> {
    if prompt_value {
        patch.value = Some(prompt_secret_value(id)?);
    }
    if patch.is_empty() {
        return Err(VaultError::CommandFailed(
            "nothing to update; pass --name, --category, --value, --prompt-value or --notes"
                .into(),
        ));
    }

    let mut session = open_session(cli)?;
    unlock(&mut session)?;

    let id = resolve_secret_id(&mut session, id)?;
    session.update_secret(id, patch)?;
    let name = session
        .secret(id)
        .map(|s| s.name.clone())
        .unwrap_or_default();
    session.lock_vault();

    output::success(&format!("Secret '{name}' updated"));

    Ok(())
}
