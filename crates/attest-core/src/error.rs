//! # Error Types
//!
//! Caller-contract violations for tree construction, proof derivation and
//! digest parsing. A proof that simply fails to verify is not an error; the
//! verifiers report it as `false`.

use thiserror::Error;

/// Errors from building trees and deriving or shape-checking proofs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// Zero records were passed to a build, root or proof operation.
    #[error("cannot commit to an empty record list")]
    EmptyInput,

    /// The requested leaf does not exist.
    #[error("leaf index {index} out of range for {len} records")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of records in the list.
        len: usize,
    },

    /// Sibling path length or index width is inconsistent with the tree.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
}

/// Errors from parsing a digest out of bytes or hex.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// Wrong number of bytes.
    #[error("invalid digest length: expected 32 bytes, got {0}")]
    InvalidLength(usize),

    /// Hex decoding failed.
    #[error("hex decode error: {0}")]
    HexDecode(String),
}
