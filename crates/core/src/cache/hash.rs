//! Storage key hashing.

use sha2::{Digest, Sha256};

/// Hash a cache key into a fixed-width row identifier.
///
/// Cast URLs are arbitrary caller input, so rows are addressed by digest
/// while the plain key is kept alongside for inspection.
pub fn key_hash(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}
