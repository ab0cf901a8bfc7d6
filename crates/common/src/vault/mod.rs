//! Credential and document vault
//!
//! This module owns every cryptographic operation DocVault performs:
//!
//! - **Account keys**: one random 256-bit ChaCha20-Poly1305 key per account,
//!   generated at registration, independent of the password
//! - **Document sealing**: authenticated encryption with a fresh nonce per call
//! - **Passwords**: Argon2id with a per-account salt, verified in constant time
//!
//! Everything here is stateless. Keys and sealed documents are handed in by
//! the caller and persisted by the storage layer, so the functions can be
//! called from any number of tasks at once.

mod error;
mod key;
mod password;

pub use error::VaultError;
pub use key::{AccountKey, KEY_SIZE, MAX_DOCUMENT_SIZE, NONCE_SIZE, TAG_SIZE};
pub use password::{PasswordHash, PasswordParams, HASH_SIZE, SALT_SIZE};

/// Generate a new account key from the OS random source.
pub fn generate_account_key() -> Result<AccountKey, VaultError> {
    AccountKey::generate()
}

/// Derive the stored verification value for a password.
pub fn hash_password(password: &str, params: &PasswordParams) -> Result<PasswordHash, VaultError> {
    PasswordHash::new(password, params)
}

/// Returns true iff `candidate` hashes to `stored` under its recorded salt.
pub fn verify_password(candidate: &str, stored: &PasswordHash) -> bool {
    stored.verify(candidate)
}

/// Seal document bytes under an account key.
pub fn encrypt_document(key: &AccountKey, plaintext: &[u8]) -> Result<Vec<u8>, VaultError> {
    key.encrypt(plaintext)
}

/// Open a sealed document. Fails closed with `VaultError::Decryption`.
pub fn decrypt_document(key: &AccountKey, ciphertext: &[u8]) -> Result<Vec<u8>, VaultError> {
    key.decrypt(ciphertext)
}
