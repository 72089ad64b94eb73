//! `aipad-vault shell`: interactive session over an unlocked vault.
//!
//! The vault stays unlocked between commands and locks itself after
//! `IDLE_TIMEOUT` without activity.  While waiting for input the shell
//! only waits until the idle deadline, then delivers the timer with
//! `tick`, so a vault left at the prompt is locked on time and its
//! passphrase and secrets are dropped.
//!
//! On a terminal, secret values are prompted without echo.  When stdin is
//! piped, the value is read as the next input line.

use std::io::{self, IsTerminal, Write};

use crate::cli::input::{Input, LineReader};
use crate::cli::output;
use crate::cli::{
    open_session, prompt_new_password, prompt_password, prompt_secret_value, resolve_secret_id,
    Cli, NEW_PASSWORD_ENV,
};
use crate::errors::{Result, VaultError};
use crate::session::{Clock, VaultSession, IDLE_TIMEOUT};
use crate::storage::KeyValueStore;
use crate::vault::{NewSecret, SecretCategory, SecretPatch};

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Status,
    Unlock,
    Lock,
    List(String),
    Get(String),
    Add {
        name: String,
        category: SecretCategory,
    },
    SetValue(String),
    Rename {
        id: String,
        name: String,
    },
    Category {
        id: String,
        category: SecretCategory,
    },
    Notes {
        id: String,
        notes: String,
    },
    Remove(String),
    Passwd,
    Quit,
    Empty,
}

impl ShellCommand {
    /// Parse a line of user input.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let cmd = match word {
            "" => ShellCommand::Empty,
            "help" | "?" => ShellCommand::Help,
            "status" => ShellCommand::Status,
            "unlock" => ShellCommand::Unlock,
            "lock" => ShellCommand::Lock,
            "list" | "ls" => ShellCommand::List(rest.to_string()),
            "get" => ShellCommand::Get(required(rest, "get <id>")?),
            "add" => {
                let (name, category) = match rest.rsplit_once(" --category ") {
                    Some((name, cat)) => (name.trim(), cat.trim().parse()?),
                    None => (rest, SecretCategory::Password),
                };
                ShellCommand::Add {
                    name: required(name, "add <name> [--category <category>]")?,
                    category,
                }
            }
            "set" => ShellCommand::SetValue(required(rest, "set <id>")?),
            "rename" => {
                let (id, name) = two(rest, "rename <id> <new name>")?;
                ShellCommand::Rename { id, name }
            }
            "category" => {
                let (id, category) = two(rest, "category <id> <category>")?;
                ShellCommand::Category {
                    id,
                    category: category.parse()?,
                }
            }
            "notes" => {
                let (id, notes) = match rest.split_once(char::is_whitespace) {
                    Some((id, notes)) => (id.to_string(), notes.trim().to_string()),
                    None => (required(rest, "notes <id> [text]")?, String::new()),
                };
                ShellCommand::Notes { id, notes }
            }
            "rm" | "remove" => ShellCommand::Remove(required(rest, "rm <id>")?),
            "passwd" => ShellCommand::Passwd,
            "quit" | "exit" => ShellCommand::Quit,
            other => {
                return Err(VaultError::CommandFailed(format!(
                    "unknown command '{other}', type `help`"
                )))
            }
        };
        Ok(cmd)
    }
}

fn required(arg: &str, usage: &str) -> Result<String> {
    if arg.is_empty() {
        return Err(VaultError::CommandFailed(format!("usage: {usage}")));
    }
    Ok(arg.to_string())
}

fn two(rest: &str, usage: &str) -> Result<(String, String)> {
    match rest.split_once(char::is_whitespace) {
        Some((a, b)) if !b.trim().is_empty() => Ok((a.to_string(), b.trim().to_string())),
        _ => Err(VaultError::CommandFailed(format!("usage: {usage}"))),
    }
}

/// Execute the `shell` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut session = open_session(cli)?;
    if !session.has_vault()? {
        output::tip("Run `aipad-vault init` to create a vault.");
        return Err(VaultError::NotFound("no vault has been created".into()));
    }

    if !session.unlock_vault(&prompt_password()?) {
        return Err(VaultError::Authentication);
    }
    output::success(&format!(
        "Vault unlocked ({} secrets). Locks after {} minutes idle. Type `help` for commands.",
        session.secrets().len(),
        IDLE_TIMEOUT.as_secs() / 60
    ));

    let mut input = LineReader::spawn(io::BufReader::new(io::stdin()));
    loop {
        print!("vault> ");
        io::stdout().flush()?;

        let line = match input.next_line(session.time_until_lock())? {
            Input::Line(line) => line,
            Input::Idle => {
                report_idle_lock(&mut session);
                continue;
            }
            Input::Closed => break,
        };
        report_idle_lock(&mut session);

        let cmd = match ShellCommand::parse(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                output::error(&e.to_string());
                continue;
            }
        };
        if cmd == ShellCommand::Quit {
            break;
        }
        if let Err(e) = run(&mut session, &mut input, cmd) {
            output::error(&e.to_string());
        }
    }

    session.lock_vault();
    output::info("Vault locked.");
    Ok(())
}

fn report_idle_lock<S: KeyValueStore, C: Clock>(session: &mut VaultSession<S, C>) {
    if session.tick() {
        println!();
        output::warning("Vault locked after inactivity. Type `unlock` to continue.");
    }
}

/// Read a secret value: hidden prompt on a terminal, next line otherwise.
fn read_value<S: KeyValueStore, C: Clock>(
    session: &mut VaultSession<S, C>,
    input: &mut LineReader,
    name: &str,
) -> Result<String> {
    if io::stdin().is_terminal() {
        return prompt_secret_value(name);
    }

    print!("Value for {name}: ");
    io::stdout().flush()?;
    match input.next_line(session.time_until_lock())? {
        Input::Line(value) => Ok(value),
        Input::Idle => {
            report_idle_lock(session);
            Err(VaultError::Locked)
        }
        Input::Closed => Err(VaultError::UserCancelled),
    }
}

fn run<S: KeyValueStore, C: Clock>(
    session: &mut VaultSession<S, C>,
    input: &mut LineReader,
    cmd: ShellCommand,
) -> Result<()> {
    match cmd {
        ShellCommand::Empty | ShellCommand::Quit => {}
        ShellCommand::Help => print_help(),
        ShellCommand::Status => {
            let secrets = session.secrets().len();
            match session.time_until_lock() {
                Some(left) => output::info(&format!(
                    "Unlocked, {secrets} secret(s), locks in {}s",
                    left.as_secs()
                )),
                None => output::info("Locked"),
            }
        }
        ShellCommand::Unlock => {
            if session.is_unlocked() {
                session.touch()?;
                output::info("Already unlocked.");
            } else if session.unlock_vault(&prompt_password()?) {
                output::success("Vault unlocked.");
            } else {
                return Err(VaultError::Authentication);
            }
        }
        ShellCommand::Lock => {
            session.lock_vault();
            output::info("Vault locked.");
        }
        ShellCommand::List(query) => {
            session.touch()?;
            let shown = session.filtered_secrets(&query);
            let filter = (!query.is_empty()).then_some(query.as_str());
            output::print_secrets_table(&shown, filter);
        }
        ShellCommand::Get(id) => {
            session.touch()?;
            let id = resolve_secret_id(session, &id)?;
            let secret = session
                .secret(id)
                .ok_or_else(|| VaultError::SecretNotFound(id.to_string()))?;
            println!("{}", secret.value);
        }
        ShellCommand::Add { name, category } => {
            session.touch()?;
            let value = read_value(session, input, &name)?;
            let id = session.add_secret(NewSecret {
                name: name.clone(),
                category,
                value,
                notes: String::new(),
            })?;
            output::success(&format!("Secret '{name}' added ({id})"));
        }
        ShellCommand::SetValue(id) => {
            session.touch()?;
            let id = resolve_secret_id(session, &id)?;
            let value = read_value(session, input, &id.to_string())?;
            let patch = SecretPatch {
                value: Some(value),
                ..SecretPatch::default()
            };
            update(session, id, patch)?;
        }
        ShellCommand::Rename { id, name } => {
            session.touch()?;
            let id = resolve_secret_id(session, &id)?;
            let patch = SecretPatch {
                name: Some(name),
                ..SecretPatch::default()
            };
            update(session, id, patch)?;
        }
        ShellCommand::Category { id, category } => {
            session.touch()?;
            let id = resolve_secret_id(session, &id)?;
            let patch = SecretPatch {
                category: Some(category),
                ..SecretPatch::default()
            };
            update(session, id, patch)?;
        }
        ShellCommand::Notes { id, notes } => {
            session.touch()?;
            let id = resolve_secret_id(session, &id)?;
            let patch = SecretPatch {
                notes: Some(notes),
                ..SecretPatch::default()
            };
            update(session, id, patch)?;
        }
        ShellCommand::Remove(id) => {
            session.touch()?;
            let id = resolve_secret_id(session, &id)?;
            session.remove_secret(id)?;
            output::success("Secret removed.");
        }
        ShellCommand::Passwd => {
            session.touch()?;
            let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;
            let count = session.change_password(&new_password)?;
            output::success(&format!("Password changed ({count} secrets re-encrypted)"));
        }
    }
    Ok(())
}

fn update<S: KeyValueStore, C: Clock>(
    session: &mut VaultSession<S, C>,
    id: uuid::Uuid,
    patch: SecretPatch,
) -> Result<()> {
    session.update_secret(id, patch)?;
    output::success("Secret updated.");
    Ok(())
}

fn print_help() {
    println!(
        "\
  list [text]                      list secrets, optionally filtered
  get <id>                         print a secret's value
  add <name> [--category <cat>]    add a secret (value is prompted)
  set <id>                         replace a secret's value (prompted)
  rename <id> <name>               rename a secret
  category <id> <cat>              change a secret's category
  notes <id> [text]                replace a secret's notes
  rm <id>                          remove a secret
  passwd                           change the vault password
  status | lock | unlock | quit"
    );
}
