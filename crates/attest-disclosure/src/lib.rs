//! # attest-disclosure — Salted Selective Disclosure
//!
//! An issuer commits to a list of attribute records (name, birth date,
//! address, …) by signing a single Merkle root. A holder later reveals one
//! record plus its inclusion proof; the verifier learns that record and
//! nothing else.
//!
//! Plain inclusion proofs leak: sibling digests are hashes of the other
//! records, and low-entropy records can be guessed by hashing candidates.
//! Every leaf is therefore committed as `salt || record`, with salts drawn
//! from a hash chain over a secret seed:
//!
//! ```text
//! salt[0] = SHA256(seed)
//! salt[i] = SHA256(salt[i - 1])
//! ```
//!
//! ## Trust Model
//!
//! Binding comes from the signed root alone. Verifiers do not check that a
//! disclosed salt is really the chain's `index`-th value; the salt only has
//! to be unguessable. Signing the root is the caller's business.
//!
//! ## Modules
//!
//! - [`sequence`] — the hash-chain generator and its 256/128/u64 views.
//! - [`salted`] — commit, disclose and verify with salted leaves.
//! - [`ledger`] — year-by-year records for proving "born by year Y".

#![deny(missing_docs)]

pub mod ledger;
pub mod salted;
pub mod sequence;

pub use ledger::{
    check_born_by, parse_year_claim, BirthYearLedger, LedgerError, YearClaim, MAX_WINDOW_YEARS,
};
pub use salted::{
    commit_salted, disclose_salted, disclose_salted_many, salted_leaf, try_verify_salted,
    verify_salted, verify_salted_for_leaf_count, SaltedEvidence, SALT_LEN,
};
pub use sequence::{generate_seed, sequence_128, sequence_256, sequence_u64, HashChain, SEED_LEN};
