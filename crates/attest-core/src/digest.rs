//! # Digest — Fixed-Width Node Hashes
//!
//! Defines `Hash256`, the 32-byte value stored in every tree slot, carried
//! in every sibling path, and produced by every hash-chain step.
//!
//! ## Wire Form
//!
//! Serializes as a lowercase 64-character hex string. Deserialization
//! rejects anything that does not decode to exactly 32 bytes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;

use crate::error::DigestError;

/// Width of a full digest in bytes.
pub const HASH_LEN: usize = 32;

/// Width of the truncated digest view in bytes.
pub const TRUNCATED_LEN: usize = 16;

/// A 32-byte SHA-256 digest.
///
/// Opaque: two digests are equal iff their bytes are equal. Use
/// [`Hash256::ct_eq`] when comparing against an attacker-supplied value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash256([u8; HASH_LEN]);

impl Hash256 {
    /// Wrap raw digest bytes.
    pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Copy a digest out of a slice, which must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DigestError> {
        if bytes.len() != HASH_LEN {
            return Err(DigestError::InvalidLength(bytes.len()));
        }
        let mut out = [0u8; HASH_LEN];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Parse a 64-char hex string. Surrounding whitespace is ignored.
    pub fn from_hex(s: &str) -> Result<Self, DigestError> {
        let bytes = hex::decode(s.trim()).map_err(|e| DigestError::HexDecode(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The leading 16 bytes of the digest.
    pub fn truncated(&self) -> [u8; TRUNCATED_LEN] {
        let mut out = [0u8; TRUNCATED_LEN];
        out.copy_from_slice(&self.0[..TRUNCATED_LEN]);
        out
    }

    /// Big-endian interpretation of the leading 8 bytes.
    pub fn leading_u64(&self) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(word)
    }

    /// Constant-time equality.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl From<[u8; HASH_LEN]> for Hash256 {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
