pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod session;
pub mod storage;
pub mod vault;
