//! Password hashing with Argon2id
//!
//! A `PasswordHash` records the salt and cost parameters next to the digest,
//! so verifying a login only needs the stored value and the candidate.

use std::fmt;
use std::str::FromStr;

use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::VaultError;

/// Size of the per-account salt in bytes
pub const SALT_SIZE: usize = 16;
/// Size of the derived digest in bytes
pub const HASH_SIZE: usize = 32;

const ALGORITHM_ID: &str = "argon2id";
const VERSION_TAG: &str = "v=19";

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordParams {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub mem_cost_kib: u32,
    /// Time cost / iterations (default: 2)
    pub time_cost: u32,
    /// Parallelism (default: 1)
    pub parallelism: u32,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            mem_cost_kib: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl PasswordParams {
    /// Check that Argon2id accepts these costs
    pub fn validate(&self) -> Result<(), VaultError> {
        self.hasher().map(|_| ())
    }

    fn hasher(&self) -> Result<Argon2<'static>, VaultError> {
        let params = Params::new(
            self.mem_cost_kib,
            self.time_cost,
            self.parallelism,
            Some(HASH_SIZE),
        )
        .map_err(|e| VaultError::invalid(format!("invalid Argon2id params: {e}")))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Stored verification value for an account password.
///
/// Text form: `argon2id$v=19$m=<kib>,t=<iters>,p=<lanes>$<salt>$<digest>` with
/// unpadded base64 for the salt and digest.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    params: PasswordParams,
    salt: [u8; SALT_SIZE],
    hash: [u8; HASH_SIZE],
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl PasswordHash {
    /// Hash a password under a fresh random salt.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty password or unusable parameters
    /// - `KeyGeneration` if no salt could be drawn
    pub fn new(password: &str, params: &PasswordParams) -> Result<Self, VaultError> {
        if password.is_empty() {
            return Err(VaultError::invalid("password must not be empty"));
        }

        let mut salt = [0u8; SALT_SIZE];
        getrandom::getrandom(&mut salt).map_err(|_| VaultError::KeyGeneration)?;

        Self::derive(password, salt, params)
    }

    fn derive(
        password: &str,
        salt: [u8; SALT_SIZE],
        params: &PasswordParams,
    ) -> Result<Self, VaultError> {
        let mut hash = [0u8; HASH_SIZE];
        params
            .hasher()?
            .hash_password_into(password.as_bytes(), &salt, &mut hash)
            .map_err(|e| VaultError::invalid(format!("Argon2id hashing failed: {e}")))?;

        Ok(Self {
            params: *params,
            salt,
            hash,
        })
    }

    /// Check a candidate password against this stored value.
    ///
    /// The digests are compared in constant time. An empty candidate never
    /// matches.
    pub fn verify(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }

        match Self::derive(candidate, self.salt, &self.params) {
            Ok(mut derived) => {
                let matches = derived.hash.ct_eq(&self.hash).into();
                derived.hash.zeroize();
                matches
            }
            Err(_) => false,
        }
    }

    pub fn params(&self) -> &PasswordParams {
        &self.params
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}${}$m={},t={},p={}${}${}",
            ALGORITHM_ID,
            VERSION_TAG,
            self.params.mem_cost_kib,
            self.params.time_cost,
            self.params.parallelism,
            STANDARD_NO_PAD.encode(self.salt),
            STANDARD_NO_PAD.encode(self.hash),
        )
    }
}

fn parse_cost(part: Option<&str>, name: &str) -> Result<u32, VaultError> {
    part.and_then(|p| p.strip_prefix(name))
        .and_then(|p| p.strip_prefix('='))
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| VaultError::invalid(format!("malformed password hash: bad '{name}' cost")))
}

fn decode_fixed<const N: usize>(encoded: &str, what: &str) -> Result<[u8; N], VaultError> {
    let bytes = STANDARD_NO_PAD
        .decode(encoded)
        .map_err(|_| VaultError::invalid(format!("malformed password hash: {what} is not base64")))?;
    bytes
        .try_into()
        .map_err(|_| VaultError::invalid(format!("malformed password hash: bad {what} length")))
}

impl FromStr for PasswordHash {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('$').collect();
        let [algorithm, version, costs, salt, hash] = parts.as_slice() else {
            return Err(VaultError::invalid("malformed password hash"));
        };

        if *algorithm != ALGORITHM_ID {
            return Err(VaultError::invalid(format!(
                "unsupported password hash algorithm: {algorithm}"
            )));
        }
        if *version != VERSION_TAG {
            return Err(VaultError::invalid(format!(
                "unsupported password hash version: {version}"
            )));
        }

        let mut costs = costs.split(',');
        let params = PasswordParams {
            mem_cost_kib: parse_cost(costs.next(), "m")?,
            time_cost: parse_cost(costs.next(), "t")?,
            parallelism: parse_cost(costs.next(), "p")?,
        };
        if costs.next().is_some() {
            return Err(VaultError::invalid("malformed password hash: extra costs"));
        }

        Ok(Self {
            params,
            salt: decode_fixed(salt, "salt")?,
            hash: decode_fixed(hash, "digest")?,
        })
    }
}

impl Serialize for PasswordHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PasswordHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
