//! The derived vault key.
//!
//! A `VaultKey` is produced only by the KDF and consumed only by the
//! cipher.  There is no way to export it or build one from a string.

use std::fmt;

use zeroize::Zeroize;

/// Length of the derived key (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A 32-byte AES-256-GCM key that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    pub(crate) fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Raw key bytes, visible to the crate's cipher and its tests.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultKey(***)")
    }
}

#[cfg(test)]
impl VaultKey {
    pub(crate) fn from_test_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self::new(bytes)
    }
}
