//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::Secret;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Longest notes text shown in a table cell before it is cut.
const NOTES_PREVIEW: usize = 40;

/// Print the secrets a `list` produced, in vault order.
///
/// Values are never printed; `get` is the only command that shows one.
/// `filter` is the search text that produced `secrets`, used to phrase
/// the empty result.
pub fn print_secrets_table(secrets: &[&Secret], filter: Option<&str>) {
    if secrets.is_empty() {
        match filter {
            Some(q) => {
                info(&format!("No secret's name, category or notes mention '{q}'."));
                tip("Run `aipad-vault list` without --search to see everything.");
            }
            None => {
                info("The vault is empty.");
                tip("Run `aipad-vault add <NAME>` to store your first secret.");
            }
        }
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Category", "Notes", "Updated (UTC)"]);

    for s in secrets {
        table.add_row(vec![
            s.id.to_string(),
            s.name.clone(),
            s.category.to_string(),
            notes_preview(&s.notes),
            s.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    println!("{table}");
}

fn notes_preview(notes: &str) -> String {
    let first_line = notes.lines().next().unwrap_or("");
    if first_line.chars().count() > NOTES_PREVIEW || notes.lines().nth(1).is_some() {
        let cut: String = first_line.chars().take(NOTES_PREVIEW).collect();
        format!("{cut}\u{2026}")
    } else {
        first_line.to_string()
    }
}
