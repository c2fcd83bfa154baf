//! # Hash Primitives
//!
//! Plain SHA-256, with no domain-separation prefix:
//! - Leaf: `SHA256(data)`.
//! - Node: `SHA256(left || right)`.

use sha2::{Digest, Sha256};

use crate::digest::{Hash256, HASH_LEN};

/// Compute SHA-256 of raw bytes.
pub fn sha256(data: &[u8]) -> Hash256 {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; HASH_LEN];
    bytes.copy_from_slice(&hash);
    Hash256::from_bytes(bytes)
}

/// Digest of a leaf record.
pub fn leaf_hash(data: &[u8]) -> Hash256 {
    sha256(data)
}

/// Digest of the concatenation `left || right`. Not commutative.
pub fn pair_hash(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; HASH_LEN];
    bytes.copy_from_slice(&hash);
    Hash256::from_bytes(bytes)
}
