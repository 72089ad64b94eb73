use thiserror::Error;

/// All errors that can occur in the vault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("invalid password or corrupted data")]
    Authentication,

    #[error("Cryptographic provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Vault errors ---
    #[error("No vault found: {0}")]
    NotFound(String),

    #[error("A vault already exists (delete it before creating a new one)")]
    VaultAlreadyExists,

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Secret '{0}' not found")]
    SecretNotFound(String),

    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    #[error("new password must differ from the current one")]
    PasswordUnchanged,

    #[error("Vault is locked")]
    Locked,

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for vault results.
pub type Result<T> = std::result::Result<T, VaultError>;
