mod daccount_key;
mod dpassword_hash;

pub use daccount_key::DAccountKey;
pub use dpassword_hash::DPasswordHash;
