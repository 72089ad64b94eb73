use clap::Parser;
use tracing_subscriber::EnvFilter;

use aipad_vault::cli::{Cli, Commands};
use aipad_vault::vault::SecretPatch;

fn main() {
    // Logs go to stderr so they never mix with secret values on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { force } => aipad_vault::cli::commands::init::execute(&cli, force),
        Commands::Status => aipad_vault::cli::commands::status::execute(&cli),
        Commands::Add {
            ref name,
            ref value,
            category,
            ref notes,
        } => {
            aipad_vault::cli::commands::add::execute(&cli, name, value.as_deref(), category, notes)
        }
        Commands::Update {
            ref id,
            ref name,
            category,
            ref value,
            prompt_value,
            ref notes,
        } => {
            let patch = SecretPatch {
                name: name.clone(),
                category,
                value: value.clone(),
                notes: notes.clone(),
            };
            aipad_vault::cli::commands::update::execute(&cli, id, patch, prompt_value)
        }
        Commands::Remove { ref id, force } => {
            aipad_vault::cli::commands::remove::execute(&cli, id, force)
        }
        Commands::List { ref search } => {
            aipad_vault::cli::commands::list::execute(&cli, search.as_deref())
        }
        Commands::Get { ref id } => aipad_vault::cli::commands::get::execute(&cli, id),
        Commands::Passwd => aipad_vault::cli::commands::passwd::execute(&cli),
        Commands::Destroy { force } => aipad_vault::cli::commands::destroy::execute(&cli, force),
        Commands::Shell => aipad_vault::cli::commands::shell::execute(&cli),
    };

    if let Err(e) = result {
        aipad_vault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
