//! # Birth-Year Ledger
//!
//! Lets a holder prove "born in or before year Y" without revealing the
//! birth year. The issuer commits one record per year of a window:
//!
//! ```text
//! index 0            ..  last - first     last - first + 1   last - first + 2
//! "{first}Y|N"       ..  "{last}Y|N"      "<{first}Y|N"       ">{last}Y|N"
//! ```
//!
//! Year `y` reads `Y` once the holder has been born (`y >= birth_year`).
//! The two trailing boundary records cover birth years outside the window.
//! To prove age over a threshold the holder discloses the record for
//! `current_year - threshold`; every other year stays hidden behind its salt.

use attest_core::{Hash256, MerkleError};
use thiserror::Error;

use crate::salted::{
    commit_salted, disclose_salted, verify_salted, verify_salted_for_leaf_count, SaltedEvidence,
};

/// Widest year window a ledger accepts, counting both ends.
pub const MAX_WINDOW_YEARS: u32 = 1000;

/// Errors from building or querying a ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The year window is empty or wider than [`MAX_WINDOW_YEARS`].
    #[error(
        "invalid year window {first}..={last}: must hold between 1 and {max} years",
        max = MAX_WINDOW_YEARS
    )]
    InvalidRange {
        /// First year of the window.
        first: i32,
        /// Last year of the window.
        last: i32,
    },

    /// The year has no record in this ledger.
    #[error("year {year} is outside the ledger window")]
    YearOutOfRange {
        /// The requested year.
        year: i32,
    },

    /// Commitment or proof derivation failed.
    #[error(transparent)]
    Merkle(#[from] MerkleError),
}

/// Per-year birth records for one holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthYearLedger {
    first_year: i32,
    last_year: i32,
    records: Vec<Vec<u8>>,
}

impl BirthYearLedger {
    /// Build the ledger for `birth_year` over the inclusive window
    /// `[first_year, last_year]`, which may span at most
    /// [`MAX_WINDOW_YEARS`] years.
    pub fn new(birth_year: i32, first_year: i32, last_year: i32) -> Result<Self, LedgerError> {
        let width = i64::from(last_year) - i64::from(first_year) + 1;
        if width < 1 || width > i64::from(MAX_WINDOW_YEARS) {
            return Err(LedgerError::InvalidRange {
                first: first_year,
                last: last_year,
            });
        }

        let mut records: Vec<Vec<u8>> = (first_year..=last_year)
            .map(|year| format!("{year}{}", mark(year >= birth_year)).into_bytes())
            .collect();
        records.push(format!("<{first_year}{}", mark(birth_year < first_year)).into_bytes());
        records.push(format!(">{last_year}{}", mark(birth_year > last_year)).into_bytes());

        Ok(Self {
            first_year,
            last_year,
            records,
        })
    }

    /// The committed records, in leaf order.
    pub fn records(&self) -> &[Vec<u8>] {
        &self.records
    }

    /// Leaf index of the record for `year`.
    pub fn index_of(&self, year: i32) -> Result<usize, LedgerError> {
        if year < self.first_year || year > self.last_year {
            return Err(LedgerError::YearOutOfRange { year });
        }
        usize::try_from(i64::from(year) - i64::from(self.first_year))
            .map_err(|_| LedgerError::YearOutOfRange { year })
    }

    /// The salted root the issuer signs.
    pub fn commit(&self, seed: &[u8]) -> Result<Hash256, LedgerError> {
        Ok(commit_salted(&self.records, seed)?)
    }

    /// Disclose the record for `year`.
    pub fn disclose_year(&self, seed: &[u8], year: i32) -> Result<SaltedEvidence, LedgerError> {
        let index = self.index_of(year)?;
        let evidence = disclose_salted(&self.records, seed, index)?;
        tracing::debug!(year, index, "disclosed birth-year record");
        Ok(evidence)
    }

    /// Verify a salted proof against this ledger's record count, so indices
    /// in the padded slots past the last record are rejected.
    pub fn verify_disclosure(&self, evidence: &SaltedEvidence) -> Result<bool, LedgerError> {
        Ok(verify_salted_for_leaf_count(evidence, self.records.len())?)
    }

    /// [`check_born_by`], additionally requiring the proof to sit at the
    /// leaf this ledger assigns to `year`.
    ///
    /// The record layout depends only on the window, so a verifier can build
    /// a ledger with any birth year to check disclosures against.
    pub fn check_born_by(
        &self,
        evidence: &SaltedEvidence,
        trusted_root: &Hash256,
        year: i32,
    ) -> bool {
        if !evidence.root.ct_eq(trusted_root) {
            tracing::debug!(root = %evidence.root, "evidence root is not the trusted root");
            return false;
        }
        if self.index_of(year).ok() != Some(evidence.index) {
            tracing::debug!(year, index = evidence.index, "evidence index does not match year");
            return false;
        }
        match self.verify_disclosure(evidence) {
            Ok(true) => claims_born_by(evidence, year),
            Ok(false) => false,
            Err(err) => {
                tracing::debug!(%err, index = evidence.index, "rejecting malformed salted proof");
                false
            }
        }
    }
}

fn mark(born: bool) -> char {
    if born {
        'Y'
    } else {
        'N'
    }
}

/// A disclosed per-year record, parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearClaim {
    /// The calendar year the record covers.
    pub year: i32,
    /// Whether the holder was born in or before `year`.
    pub born: bool,
}

/// Parse an in-window record such as `b"2006Y"`. Boundary records and
/// anything else yield `None`.
pub fn parse_year_claim(raw: &[u8]) -> Option<YearClaim> {
    let (&flag, digits) = raw.split_last()?;
    let born = match flag {
        b'Y' => true,
        b'N' => false,
        _ => return None,
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let year = std::str::from_utf8(digits).ok()?.parse().ok()?;
    Some(YearClaim { year, born })
}

/// Accept `evidence` as proof the holder was born in or before `year`.
///
/// The root must be the one the verifier already trusts (its signature is
/// checked elsewhere), the salted proof must verify, and the disclosed
/// record must be `"{year}Y"`.
pub fn check_born_by(evidence: &SaltedEvidence, trusted_root: &Hash256, year: i32) -> bool {
    if !evidence.root.ct_eq(trusted_root) {
        tracing::debug!(root = %evidence.root, "evidence root is not the trusted root");
        return false;
    }
    verify_salted(evidence) && claims_born_by(evidence, year)
}

fn claims_born_by(evidence: &SaltedEvidence, year: i32) -> bool {
    matches!(
        parse_year_claim(&evidence.raw_data),
        Some(YearClaim { year: y, born: true }) if y == year
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> BirthYearLedger {
        BirthYearLedger::new(1985, 1900, 2020).unwrap()
    }

    #[test]
    fn test_record_layout() {
        let l = ledger();
        let records = l.records();
        assert_eq!(records.len(), 121 + 2);
        assert_eq!(records[0], b"1900N");
        assert_eq!(records[84], b"1984N");
        assert_eq!(records[85], b"1985Y");
        assert_eq!(records[120], b"2020Y");
        assert_eq!(records[121], b"<1900N");
        assert_eq!(records[122], b">2020N");
    }

    #[test]
    fn test_boundary_records_outside_window() {
        let early = BirthYearLedger::new(1890, 1900, 2020).unwrap();
        assert_eq!(early.records()[0], b"1900Y");
        assert_eq!(early.records()[121], b"<1900Y");
        assert_eq!(early.records()[122], b">2020N");

        let late = BirthYearLedger::new(2021, 1900, 2020).unwrap();
        assert_eq!(late.records()[120], b"2020N");
        assert_eq!(late.records()[121], b"<1900N");
        assert_eq!(late.records()[122], b">2020Y");
    }

    #[test]
    fn test_invalid_window() {
        assert_eq!(
            BirthYearLedger::new(1985, 2020, 1900).unwrap_err(),
            LedgerError::InvalidRange {
                first: 2020,
                last: 1900
            }
        );
    }

    #[test]
    fn test_window_too_wide() {
        assert_eq!(
            BirthYearLedger::new(1985, i32::MIN, i32::MAX).unwrap_err(),
            LedgerError::InvalidRange {
                first: i32::MIN,
                last: i32::MAX
            }
        );
        assert!(BirthYearLedger::new(1985, 1000, 1999).is_ok());
        assert!(matches!(
            BirthYearLedger::new(1985, 1000, 2000),
            Err(LedgerError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_single_year_window() {
        let l = BirthYearLedger::new(1985, 2000, 2000).unwrap();
        assert_eq!(l.records().len(), 3);
    }

    #[test]
    fn test_index_of() {
        let l = ledger();
        assert_eq!(l.index_of(1900), Ok(0));
        assert_eq!(l.index_of(2008), Ok(108));
        assert_eq!(
            l.index_of(1899),
            Err(LedgerError::YearOutOfRange { year: 1899 })
        );
        assert_eq!(
            l.index_of(2021),
            Err(LedgerError::YearOutOfRange { year: 2021 })
        );
    }

    #[test]
    fn test_born_by_accepted() {
        let l = ledger();
        let root = l.commit(b"seed").unwrap();
        let evidence = l.disclose_year(b"seed", 2008).unwrap();
        assert_eq!(evidence.raw_data, b"2008Y");
        assert!(check_born_by(&evidence, &root, 2008));
    }

    #[test]
    fn test_not_yet_born_rejected() {
        let l = ledger();
        let root = l.commit(b"seed").unwrap();
        let evidence = l.disclose_year(b"seed", 1980).unwrap();
        assert!(verify_salted(&evidence));
        assert!(!check_born_by(&evidence, &root, 1980));
    }

    #[test]
    fn test_wrong_year_rejected() {
        let l = ledger();
        let root = l.commit(b"seed").unwrap();
        let evidence = l.disclose_year(b"seed", 2000).unwrap();
        assert!(!check_born_by(&evidence, &root, 2008));
    }

    #[test]
    fn test_untrusted_root_rejected() {
        let l = ledger();
        let other_root = l.commit(b"other-seed").unwrap();
        let evidence = l.disclose_year(b"seed", 2008).unwrap();
        assert!(!check_born_by(&evidence, &other_root, 2008));
    }

    #[test]
    fn test_forged_record_rejected() {
        let l = ledger();
        let root = l.commit(b"seed").unwrap();
        let mut evidence = l.disclose_year(b"seed", 1980).unwrap();
        evidence.raw_data = b"1980Y".to_vec();
        assert!(!check_born_by(&evidence, &root, 1980));
    }

    #[test]
    fn test_ledger_check_born_by() {
        let l = ledger();
        let root = l.commit(b"seed").unwrap();
        let evidence = l.disclose_year(b"seed", 2008).unwrap();
        assert!(l.check_born_by(&evidence, &root, 2008));
        assert!(!l.check_born_by(&evidence, &root, 2007));

        // Same window, different holder: the layout still matches.
        let verifier = BirthYearLedger::new(1900, 1900, 2020).unwrap();
        assert!(verifier.check_born_by(&evidence, &root, 2008));
    }

    #[test]
    fn test_padding_slot_index_rejected() {
        // 123 records pad to 128 leaves; the last record's leaf-level
        // sibling is its own duplicate, so index 123 folds to the same root.
        let l = ledger();
        let mut evidence = disclose_salted(l.records(), b"seed", 122).unwrap();
        assert_eq!(l.verify_disclosure(&evidence), Ok(true));
        evidence.index = 123;
        assert!(verify_salted(&evidence));
        assert_eq!(
            l.verify_disclosure(&evidence),
            Err(LedgerError::Merkle(MerkleError::IndexOutOfRange {
                index: 123,
                len: 123
            }))
        );
    }

    #[test]
    fn test_ledger_check_rejects_moved_index() {
        let l = ledger();
        let root = l.commit(b"seed").unwrap();
        let mut evidence = l.disclose_year(b"seed", 2008).unwrap();
        evidence.index = 109;
        assert!(!l.check_born_by(&evidence, &root, 2008));
    }

    #[test]
    fn test_parse_year_claim() {
        assert_eq!(
            parse_year_claim(b"2006Y"),
            Some(YearClaim {
                year: 2006,
                born: true
            })
        );
        assert_eq!(
            parse_year_claim(b"1950N"),
            Some(YearClaim {
                year: 1950,
                born: false
            })
        );
        assert_eq!(parse_year_claim(b"<1900Y"), None);
        assert_eq!(parse_year_claim(b">2020N"), None);
        assert_eq!(parse_year_claim(b"2006X"), None);
        assert_eq!(parse_year_claim(b"Y"), None);
        assert_eq!(parse_year_claim(b""), None);
        assert_eq!(parse_year_claim(&[0xff, b'Y']), None);
    }

    #[test]
    fn test_disclose_out_of_window() {
        let l = ledger();
        assert_eq!(
            l.disclose_year(b"seed", 1800).unwrap_err(),
            LedgerError::YearOutOfRange { year: 1800 }
        );
    }
}
