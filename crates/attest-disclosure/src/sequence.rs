//! # Hash-Chain Sequences
//!
//! Deterministic per-position values derived from a caller-supplied seed.
//! Element `i` is the hash of element `i - 1`, so the chain is strictly
//! sequential: reaching position `k` costs `k + 1` hashes.

use attest_core::{sha256, Hash256, TRUNCATED_LEN};
use rand::{CryptoRng, RngCore};

/// Length of seeds produced by [`generate_seed`].
pub const SEED_LEN: usize = 32;

/// Unbounded iterator over the hash chain rooted at `seed`.
#[derive(Debug, Clone)]
pub struct HashChain<'a> {
    seed: &'a [u8],
    last: Option<Hash256>,
}

impl<'a> HashChain<'a> {
    /// Start a chain whose first value is `SHA256(seed)`.
    pub fn new(seed: &'a [u8]) -> Self {
        Self { seed, last: None }
    }
}

impl Iterator for HashChain<'_> {
    type Item = Hash256;

    fn next(&mut self) -> Option<Hash256> {
        let next = match &self.last {
            None => sha256(self.seed),
            Some(prev) => sha256(prev.as_bytes()),
        };
        self.last = Some(next);
        Some(next)
    }
}

/// The first `count` chain values.
pub fn sequence_256(seed: &[u8], count: usize) -> Vec<Hash256> {
    HashChain::new(seed).take(count).collect()
}

/// The first `count` chain values, each truncated to its leading 16 bytes.
pub fn sequence_128(seed: &[u8], count: usize) -> Vec<[u8; TRUNCATED_LEN]> {
    HashChain::new(seed)
        .take(count)
        .map(|d| d.truncated())
        .collect()
}

/// The first `count` chain values, each read as a big-endian `u64` from its
/// leading 8 bytes.
pub fn sequence_u64(seed: &[u8], count: usize) -> Vec<u64> {
    HashChain::new(seed)
        .take(count)
        .map(|d| d.leading_u64())
        .collect()
}

/// Draw a fresh chain seed from `rng`.
pub fn generate_seed<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; SEED_LEN] {
    let mut seed = [0u8; SEED_LEN];
    rng.fill_bytes(&mut seed);
    seed
}
