//! Configuration loading (`.aipad.toml`).

pub mod settings;

pub use settings::Settings;
