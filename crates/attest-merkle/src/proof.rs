//! # Inclusion Proofs
//!
//! Derivation and verification of leaf-to-root sibling paths.
//!
//! ## Verification
//!
//! Starting from `leaf_hash(raw_data)` and the leaf index, each sibling is
//! folded in on the side given by the current index's low bit (odd: sibling
//! on the left; even: sibling on the right), then the index is shifted right.
//! The result must equal the claimed root.
//!
//! [`verify`] never errors: tampered and malformed proofs are both `false`.
//! [`try_verify`] and [`verify_for_leaf_count`] report malformed shapes as
//! [`MerkleError::MalformedProof`] so callers can tell the two apart.

use attest_core::{leaf_hash, pair_hash, Hash256, MerkleError};
use serde::{Deserialize, Serialize};

use crate::tree::MerkleTree;

/// Proof that `raw_data` sits at `index` in the list committed to by `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// 0-based leaf position.
    pub index: usize,
    /// The disclosed record.
    #[serde(with = "hex")]
    pub raw_data: Vec<u8>,
    /// Sibling digests, leaf level first.
    pub siblings: Vec<Hash256>,
    /// The claimed root.
    pub root: Hash256,
}

impl Evidence {
    /// Digest of the disclosed record as it appears on the leaf level.
    pub fn leaf_hash(&self) -> Hash256 {
        leaf_hash(&self.raw_data)
    }
}

/// Derive the inclusion proof for `records[index]`.
pub fn derive_proof<R: AsRef<[u8]>>(records: &[R], index: usize) -> Result<Evidence, MerkleError> {
    let tree = MerkleTree::build(records)?;
    evidence_from_tree(&tree, records, index)
}

/// Derive proofs for several indices, building the tree once.
pub fn derive_proofs<R: AsRef<[u8]>>(
    records: &[R],
    indices: &[usize],
) -> Result<Vec<Evidence>, MerkleError> {
    let tree = MerkleTree::build(records)?;
    indices
        .iter()
        .map(|&index| evidence_from_tree(&tree, records, index))
        .collect()
}

fn evidence_from_tree<R: AsRef<[u8]>>(
    tree: &MerkleTree,
    records: &[R],
    index: usize,
) -> Result<Evidence, MerkleError> {
    let siblings = tree.proof_path(index)?;
    let raw_data = records
        .get(index)
        .map(|r| r.as_ref().to_vec())
        .ok_or(MerkleError::IndexOutOfRange {
            index,
            len: records.len(),
        })?;

    tracing::debug!(index, path_len = siblings.len(), "derived inclusion proof");

    Ok(Evidence {
        index,
        raw_data,
        siblings,
        root: tree.root(),
    })
}

/// Verify an inclusion proof. Returns `false` for invalid or malformed proofs.
///
/// Without the record count the padded slots `n..P` cannot be told apart:
/// under the duplicate-left rule the proof for the last leaf also folds to
/// the root with the index of any padding slot to its right. Use
/// [`verify_for_leaf_count`] when the index itself must be bound.
pub fn verify(evidence: &Evidence) -> bool {
    match try_verify(evidence) {
        Ok(valid) => valid,
        Err(err) => {
            tracing::debug!(%err, index = evidence.index, "rejecting malformed proof");
            false
        }
    }
}

/// Verify an inclusion proof, reporting shape violations as errors.
///
/// The only shape check possible without knowing the record count is that
/// the index fits in as many bits as there are siblings.
pub fn try_verify(evidence: &Evidence) -> Result<bool, MerkleError> {
    let leaf = evidence.leaf_hash();

    // Single-leaf tree: the leaf is the root.
    if evidence.index == 0 && evidence.siblings.is_empty() && leaf.ct_eq(&evidence.root) {
        return Ok(true);
    }

    check_index_width(evidence.index, evidence.siblings.len())?;

    let computed = fold_path(leaf, evidence.index, &evidence.siblings);
    Ok(computed.ct_eq(&evidence.root))
}

/// Verify against a tree known to hold `leaf_count` records.
///
/// Rejects an index outside the list and any sibling path whose length
/// differs from `log2(leaf_count.next_power_of_two())`.
pub fn verify_for_leaf_count(evidence: &Evidence, leaf_count: usize) -> Result<bool, MerkleError> {
    if leaf_count == 0 {
        return Err(MerkleError::EmptyInput);
    }
    if evidence.index >= leaf_count {
        return Err(MerkleError::IndexOutOfRange {
            index: evidence.index,
            len: leaf_count,
        });
    }
    let width = leaf_count.checked_next_power_of_two().ok_or_else(|| {
        MerkleError::MalformedProof(format!("leaf count {leaf_count} exceeds the index width"))
    })?;
    let expected = width.trailing_zeros() as usize;
    if evidence.siblings.len() != expected {
        return Err(MerkleError::MalformedProof(format!(
            "expected {expected} siblings for {leaf_count} records, got {}",
            evidence.siblings.len()
        )));
    }
    try_verify(evidence)
}

fn check_index_width(index: usize, path_len: usize) -> Result<(), MerkleError> {
    if path_len >= usize::BITS as usize {
        return Err(MerkleError::MalformedProof(format!(
            "sibling path of length {path_len} exceeds index width"
        )));
    }
    if index >> path_len != 0 {
        return Err(MerkleError::MalformedProof(format!(
            "index {index} does not fit a path of {path_len} siblings"
        )));
    }
    Ok(())
}

fn fold_path(leaf: Hash256, index: usize, siblings: &[Hash256]) -> Hash256 {
    let mut current = leaf;
    let mut idx = index;
    for sibling in siblings {
        current = if idx & 1 == 1 {
            pair_hash(sibling, &current)
        } else {
            pair_hash(&current, sibling)
        };
        idx >>= 1;
    }
    current
}
