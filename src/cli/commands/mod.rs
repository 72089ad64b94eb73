//! One module per subcommand.

pub mod add;
pub mod destroy;
pub mod get;
pub mod init;
pub mod list;
pub mod passwd;
pub mod remove;
pub mod shell;
pub mod status;
pub mod update;
