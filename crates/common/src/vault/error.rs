/// Failures reported by the vault.
///
/// Messages never carry key material, passwords or plaintext, and
/// `Decryption` deliberately does not say which check failed.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("secure random source unavailable")]
    KeyGeneration,
    #[error("document could not be decrypted")]
    Decryption,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl VaultError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        VaultError::InvalidInput(msg.into())
    }
}
