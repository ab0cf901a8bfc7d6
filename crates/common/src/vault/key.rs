//! Per-account document encryption using ChaCha20-Poly1305
//!
//! Every account owns exactly one `AccountKey`, generated at registration and
//! never rotated. All of the account's documents are sealed under it, each with
//! its own random nonce.

use std::fmt;

use base64::Engine;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::VaultError;

/// Size of ChaCha20-Poly1305 nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of the Poly1305 authentication tag in bytes
pub const TAG_SIZE: usize = 16;
/// Size of an account key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;
/// Largest plaintext accepted by `AccountKey::encrypt`
pub const MAX_DOCUMENT_SIZE: usize = 512 * 1024 * 1024;

/// A 256-bit symmetric key owned by a single account.
///
/// Sealed documents have the layout `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
/// The key is wiped from memory on drop and never shows up in `Debug` output.
///
/// # Examples
///
/// ```
/// use common::vault::AccountKey;
///
/// let key = AccountKey::generate().unwrap();
/// let sealed = key.encrypt(b"hello world").unwrap();
/// assert_eq!(key.decrypt(&sealed).unwrap(), b"hello world");
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccountKey([u8; KEY_SIZE]);

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccountKey").field(&"[REDACTED]").finish()
    }
}

impl PartialEq for AccountKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for AccountKey {}

impl From<[u8; KEY_SIZE]> for AccountKey {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        AccountKey(bytes)
    }
}

impl AccountKey {
    /// Generate a fresh key from the operating system's CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::KeyGeneration` if the random source is unavailable.
    /// There is no fallback to a weaker source.
    pub fn generate() -> Result<Self, VaultError> {
        let mut buff = [0u8; KEY_SIZE];
        getrandom::getrandom(&mut buff).map_err(|_| VaultError::KeyGeneration)?;
        let key = Self(buff);
        buff.zeroize();
        Ok(key)
    }

    /// Generate a key from a caller-supplied cryptographic RNG.
    pub fn generate_with<R>(rng: &mut R) -> Self
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let mut buff = [0u8; KEY_SIZE];
        rng.fill_bytes(&mut buff);
        let key = Self(buff);
        buff.zeroize();
        key
    }

    /// Create a key from a byte slice
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` if the slice is not exactly `KEY_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, VaultError> {
        if data.len() != KEY_SIZE {
            return Err(VaultError::invalid(format!(
                "invalid key size, expected {}, got {}",
                KEY_SIZE,
                data.len()
            )));
        }
        let mut buff = [0u8; KEY_SIZE];
        buff.copy_from_slice(data);
        let key = Self(buff);
        buff.zeroize();
        Ok(key)
    }

    pub fn from_base64(encoded: &str) -> Result<Self, VaultError> {
        let mut bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|_| VaultError::invalid("key is not valid base64"))?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Seal a document under this key.
    ///
    /// A random nonce is drawn for every call, so sealing the same plaintext
    /// twice yields different output. Empty plaintext is accepted.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the plaintext exceeds `MAX_DOCUMENT_SIZE`
    /// - `KeyGeneration` if no nonce could be drawn
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, VaultError> {
        if plaintext.len() > MAX_DOCUMENT_SIZE {
            return Err(VaultError::invalid(format!(
                "document of {} bytes exceeds the {} byte limit",
                plaintext.len(),
                MAX_DOCUMENT_SIZE
            )));
        }

        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes).map_err(|_| VaultError::KeyGeneration)?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| VaultError::invalid("document could not be encrypted"))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(nonce.as_ref());
        out.extend_from_slice(&ciphertext);

        Ok(out)
    }

    /// Open a document sealed by `encrypt`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Decryption` if the input is truncated, was
    /// modified, or was sealed under a different key. No plaintext is
    /// returned on any failure path.
    pub fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, VaultError> {
        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(VaultError::Decryption);
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| VaultError::Decryption)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_encrypt_decrypt() {
        let key = AccountKey::generate().unwrap();
        let data = b"hello world, this is a test message for encryption";

        let sealed = key.encrypt(data).unwrap();
        assert_eq!(sealed.len(), NONCE_SIZE + data.len() + TAG_SIZE);

        let opened = key.decrypt(&sealed).unwrap();
        assert_eq!(data.as_slice(), opened.as_slice());
    }

    #[test]
    fn test_encrypt_empty_document() {
        let key = AccountKey::generate().unwrap();
        let sealed = key.encrypt(b"").unwrap();
        assert_eq!(sealed.len(), NONCE_SIZE + TAG_SIZE);
        assert!(key.decrypt(&sealed).unwrap().is_empty());
    }

    #[test]
    fn test_key_size_validation() {
        assert!(AccountKey::from_slice(&[1u8; 16]).is_err());
        assert!(AccountKey::from_slice(&[1u8; 64]).is_err());
        assert!(AccountKey::from_slice(&[1u8; KEY_SIZE]).is_ok());
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = AccountKey::generate_with(&mut StdRng::seed_from_u64(7));
        let b = AccountKey::generate_with(&mut StdRng::seed_from_u64(7));
        let c = AccountKey::generate_with(&mut StdRng::seed_from_u64(8));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let keys: HashSet<[u8; KEY_SIZE]> = (0..1000)
            .map(|_| *AccountKey::generate().unwrap().as_bytes())
            .collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn test_base64_round_trip() {
        let key = AccountKey::generate().unwrap();
        let restored = AccountKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key, restored);
    }

    #[test]
    fn test_malformed_base64_key() {
        assert!(matches!(
            AccountKey::from_base64("not base64!"),
            Err(VaultError::InvalidInput(_))
        ));
        // valid base64, wrong length
        assert!(matches!(
            AccountKey::from_base64("AAAA"),
            Err(VaultError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_truncated_input_fails_closed() {
        let key = AccountKey::generate().unwrap();
        let sealed = key.encrypt(b"some document").unwrap();

        for len in [0, 1, NONCE_SIZE, NONCE_SIZE + TAG_SIZE - 1, sealed.len() - 1] {
            assert!(matches!(
                key.decrypt(&sealed[..len]),
                Err(VaultError::Decryption)
            ));
        }
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = AccountKey::from([0xAB; KEY_SIZE]);
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.to_lowercase().contains("ab, ab"));
        assert!(!rendered.contains("171"));
    }
}
