//! Shared helpers for vault integration tests
#![allow(dead_code)]

use common::vault::{AccountKey, PasswordParams};

/// Cheap Argon2id costs so the suite stays fast
pub fn fast_params() -> PasswordParams {
    PasswordParams {
        mem_cost_kib: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}

/// Two distinct account keys
pub fn key_pair() -> (AccountKey, AccountKey) {
    let a = AccountKey::generate().unwrap();
    let b = AccountKey::generate().unwrap();
    assert_ne!(a, b);
    (a, b)
}

/// Sample documents of assorted sizes, including the empty one
pub fn sample_documents() -> Vec<Vec<u8>> {
    vec![
        Vec::new(),
        b"x".to_vec(),
        b"hello world".to_vec(),
        (0..=255u8).collect(),
        vec![0u8; 64 * 1024 + 3],
    ]
}
