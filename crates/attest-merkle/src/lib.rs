//! # attest-merkle — Array-Layout Merkle Trees
//!
//! Commits an ordered list of opaque byte records to a single
//! [`Hash256`](attest_core::Hash256) root and proves membership of any one
//! record with a sibling path.
//!
//! ## Layout
//!
//! For `n` records the leaf level is padded to `P = n.next_power_of_two()`
//! slots. Slots past `n` are [`Node::Absent`]. Each level above combines
//! adjacent pairs:
//!
//! - absent left: parent is absent;
//! - absent right: parent is `pair_hash(left, left)` (duplicate-left rule);
//! - otherwise: parent is `pair_hash(left, right)`.
//!
//! [`MerkleTree::flatten`] yields the level-major array of `2P - 1` slots,
//! root last.
//!
//! ## Proofs
//!
//! [`derive_proof`] returns an [`Evidence`] whose siblings run leaf-to-root.
//! [`verify`] folds them back up and compares against the claimed root.

#![deny(missing_docs)]

pub mod node;
pub mod proof;
pub mod tree;

pub use node::Node;
pub use proof::{
    derive_proof, derive_proofs, try_verify, verify, verify_for_leaf_count, Evidence,
};
pub use tree::{build_tree, compute_root, MerkleTree};
