//! # attest-core — Foundational Types for Attribute Attestation
//!
//! This crate is the leaf of the workspace DAG. It defines the digest type
//! and the two hash primitives every commitment in the workspace is built
//! from, plus the error taxonomy shared by the tree and disclosure crates.
//!
//! ## Key Design Principles
//!
//! 1. **`Hash256` newtype.** Digests are fixed 32-byte values compared by
//!    exact byte equality. No bare `Vec<u8>` for node hashes.
//!
//! 2. **Order-sensitive pair hashing.** `pair_hash(a, b)` digests `a || b`;
//!    swapping the arguments yields a different node.
//!
//! 3. **Contract violations are errors, invalid proofs are `false`.** See
//!    [`MerkleError`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `attest-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

#![deny(missing_docs)]

pub mod digest;
pub mod error;
pub mod hash;

// Re-export primary types for ergonomic imports.
pub use digest::{Hash256, HASH_LEN, TRUNCATED_LEN};
pub use error::{DigestError, MerkleError};
pub use hash::{leaf_hash, pair_hash, sha256};
