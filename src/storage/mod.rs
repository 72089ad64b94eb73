//! Durable key-value storage behind the vault.
//!
//! The vault only needs a handful of operations on string entries, so it
//! talks to a `KeyValueStore` rather than to a file or database directly.
//!
//! - `MemoryStore` keeps entries in a `HashMap` (tests, embedding).
//! - `FileStore` keeps entries in one JSON object on disk.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::errors::Result;

/// A string-keyed durable store.
pub trait KeyValueStore {
    /// Read an entry, or `None` if it was never set or has been removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or overwrite an entry.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Create or overwrite several entries as one write.
    ///
    /// Either every entry is stored or, on error, none of them is.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove an entry.  Removing a missing entry is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}
