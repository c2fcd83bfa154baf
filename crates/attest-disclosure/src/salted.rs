//! # Salted Commitments
//!
//! Leaf `i` is committed as `salt[i] || records[i]` where `salt` is the
//! hash chain over the issuer's seed. Disclosure hands out the salt as its
//! own field so the verifier sees the record exactly as issued.

use attest_core::{Hash256, MerkleError, HASH_LEN};
use attest_merkle::{
    compute_root, derive_proof, derive_proofs, try_verify, verify_for_leaf_count, Evidence,
};
use serde::{Deserialize, Serialize};

use crate::sequence::sequence_256;

/// Width of the per-leaf salt.
pub const SALT_LEN: usize = HASH_LEN;

/// An inclusion proof for a salted leaf.
///
/// The committed leaf is always `salt || raw_data`, never `raw_data` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltedEvidence {
    /// 0-based leaf position.
    pub index: usize,
    /// Chain value prefixed to the record before hashing.
    pub salt: Hash256,
    /// The disclosed record, without its salt.
    #[serde(with = "hex")]
    pub raw_data: Vec<u8>,
    /// Sibling digests, leaf level first.
    pub siblings: Vec<Hash256>,
    /// The claimed root.
    pub root: Hash256,
}

impl SaltedEvidence {
    /// The plain proof over the salted leaf.
    pub fn to_evidence(&self) -> Evidence {
        Evidence {
            index: self.index,
            raw_data: salted_leaf(&self.salt, &self.raw_data),
            siblings: self.siblings.clone(),
            root: self.root,
        }
    }

    fn from_evidence(evidence: Evidence, salt: Hash256) -> Result<Self, MerkleError> {
        let Evidence {
            index,
            raw_data: mut leaf,
            siblings,
            root,
        } = evidence;
        if leaf.len() < SALT_LEN {
            return Err(MerkleError::MalformedProof(format!(
                "salted leaf of {} bytes is shorter than its salt",
                leaf.len()
            )));
        }
        let raw_data = leaf.split_off(SALT_LEN);
        Ok(Self {
            index,
            salt,
            raw_data,
            siblings,
            root,
        })
    }
}

/// The committed form of a record: `salt || raw`.
pub fn salted_leaf(salt: &Hash256, raw: &[u8]) -> Vec<u8> {
    let mut leaf = Vec::with_capacity(SALT_LEN + raw.len());
    leaf.extend_from_slice(salt.as_bytes());
    leaf.extend_from_slice(raw);
    leaf
}

fn blind<R: AsRef<[u8]>>(records: &[R], seed: &[u8]) -> (Vec<Vec<u8>>, Vec<Hash256>) {
    let salts = sequence_256(seed, records.len());
    let blinded = records
        .iter()
        .zip(&salts)
        .map(|(record, salt)| salted_leaf(salt, record.as_ref()))
        .collect();
    (blinded, salts)
}

/// Root committing to `records`, each salted from the chain over `seed`.
pub fn commit_salted<R: AsRef<[u8]>>(records: &[R], seed: &[u8]) -> Result<Hash256, MerkleError> {
    let (blinded, _) = blind(records, seed);
    compute_root(&blinded)
}

/// Disclose `records[index]` with its salt and inclusion proof.
pub fn disclose_salted<R: AsRef<[u8]>>(
    records: &[R],
    seed: &[u8],
    index: usize,
) -> Result<SaltedEvidence, MerkleError> {
    let (blinded, salts) = blind(records, seed);
    let evidence = derive_proof(&blinded, index)?;
    SaltedEvidence::from_evidence(evidence, salts[index])
}

/// Disclose several records at once, building the tree once.
pub fn disclose_salted_many<R: AsRef<[u8]>>(
    records: &[R],
    seed: &[u8],
    indices: &[usize],
) -> Result<Vec<SaltedEvidence>, MerkleError> {
    let (blinded, salts) = blind(records, seed);
    derive_proofs(&blinded, indices)?
        .into_iter()
        .map(|evidence| {
            let salt = salts[evidence.index];
            SaltedEvidence::from_evidence(evidence, salt)
        })
        .collect()
}

/// Verify a salted proof. Returns `false` for invalid or malformed proofs.
///
/// Like [`attest_merkle::verify`], this cannot reject an index in the padded
/// range `n..P`; use [`verify_salted_for_leaf_count`] to bind the index.
pub fn verify_salted(evidence: &SaltedEvidence) -> bool {
    match try_verify_salted(evidence) {
        Ok(valid) => valid,
        Err(err) => {
            tracing::debug!(%err, index = evidence.index, "rejecting malformed salted proof");
            false
        }
    }
}

/// Verify a salted proof, reporting shape violations as errors.
pub fn try_verify_salted(evidence: &SaltedEvidence) -> Result<bool, MerkleError> {
    try_verify(&evidence.to_evidence())
}

/// Verify a salted proof against a commitment known to hold `leaf_count`
/// records, rejecting indices outside the list and paths of the wrong depth.
pub fn verify_salted_for_leaf_count(
    evidence: &SaltedEvidence,
    leaf_count: usize,
) -> Result<bool, MerkleError> {
    verify_for_leaf_count(&evidence.to_evidence(), leaf_count)
}
