/**
 * Credential and document vault.
 *  - Per-account key generation
 *  - Authenticated document encryption
 *  - Salted password hashing and verification
 */
pub mod vault;
/**
 * Helper for reporting build version information
 *  captured at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::vault::{
        decrypt_document, encrypt_document, generate_account_key, hash_password,
        verify_password, AccountKey, PasswordHash, PasswordParams, VaultError,
    };
    pub use crate::version::{build_info, BuildInfo};
}
