//! # Tree Builder
//!
//! Builds the padded binary tree as an arena of levels, leaf level first.
//! The flattened level-major array described in the crate docs is produced
//! on demand by [`MerkleTree::flatten`].
//!
//! For records `[tx1, tx2, tx3, tx4]`:
//!
//! ```text
//!          root = h(h12 || h34)
//!         /                    \
//!   h12 = h(h1 || h2)    h34 = h(h3 || h4)
//!    /        \            /        \
//! h(tx1)    h(tx2)      h(tx3)    h(tx4)
//!
//! flattened: [h1 h2 h3 h4 h12 h34 root]
//! ```

use attest_core::{leaf_hash, Hash256, MerkleError};

use crate::node::Node;

/// A fully built tree.
///
/// `levels[0]` is the padded leaf level of `P` slots; each following level
/// is half the length of the one before; the last level holds only the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Node>>,
    leaf_count: usize,
    root: Hash256,
}

impl MerkleTree {
    /// Build a tree over `records`. Fails with [`MerkleError::EmptyInput`]
    /// when there are none.
    pub fn build<R: AsRef<[u8]>>(records: &[R]) -> Result<Self, MerkleError> {
        if records.is_empty() {
            return Err(MerkleError::EmptyInput);
        }
        let leaf_count = records.len();
        let width = leaf_count.next_power_of_two();

        let mut leaves: Vec<Node> = records
            .iter()
            .map(|r| Node::Present(leaf_hash(r.as_ref())))
            .collect();
        leaves.resize(width, Node::Absent);

        let mut levels = vec![leaves];
        loop {
            let current = &levels[levels.len() - 1];
            if current.len() == 1 {
                break;
            }
            let next = combine_level(current);
            levels.push(next);
        }

        // Slot 0 of every level descends from leaf 0, which is always present.
        let root = match levels.last().and_then(|level| level.first()) {
            Some(Node::Present(d)) => *d,
            _ => return Err(MerkleError::EmptyInput),
        };

        tracing::debug!(
            leaf_count,
            padded_width = width,
            height = levels.len() - 1,
            root = %root,
            "built merkle tree"
        );

        Ok(Self {
            levels,
            leaf_count,
            root,
        })
    }

    /// The root digest.
    pub fn root(&self) -> Hash256 {
        self.root
    }

    /// Number of real records committed.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Width of the padded leaf level (`P`).
    pub fn padded_width(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of levels above the leaves, i.e. the length of every sibling
    /// path this tree produces. `0` for a single-record tree.
    pub fn height(&self) -> usize {
        self.levels.len() - 1
    }

    /// Per-level slots, leaf level first.
    pub fn levels(&self) -> &[Vec<Node>] {
        &self.levels
    }

    /// The level-major array of `2P - 1` slots, root last.
    pub fn flatten(&self) -> Vec<Node> {
        self.levels.iter().flatten().copied().collect()
    }

    /// Sibling digests for the leaf at `index`, ordered leaf-to-root.
    ///
    /// At each level the ancestor of the leaf sits at `index >> level`; its
    /// sibling is the neighbour across the lowest bit. When that slot is
    /// absent the builder hashed the ancestor with itself, so the slot one
    /// to the left (the ancestor) is what the verifier must fold in.
    pub fn proof_path(&self, index: usize) -> Result<Vec<Hash256>, MerkleError> {
        if index >= self.leaf_count {
            return Err(MerkleError::IndexOutOfRange {
                index,
                len: self.leaf_count,
            });
        }

        let mut siblings = Vec::with_capacity(self.height());
        for (level_no, level) in self.levels[..self.height()].iter().enumerate() {
            let ancestor = index >> level_no;
            let mut pos = ancestor ^ 1;
            if level[pos].is_absent() {
                pos -= 1;
            }
            match level[pos] {
                Node::Present(d) => siblings.push(d),
                Node::Absent => {
                    return Err(MerkleError::MalformedProof(format!(
                        "no sibling for ancestor {ancestor} at level {level_no}"
                    )))
                }
            }
        }
        Ok(siblings)
    }
}

#[cfg(not(feature = "parallel"))]
fn combine_level(level: &[Node]) -> Vec<Node> {
    level
        .chunks_exact(2)
        .map(|pair| Node::combine(&pair[0], &pair[1]))
        .collect()
}

#[cfg(feature = "parallel")]
fn combine_level(level: &[Node]) -> Vec<Node> {
    use rayon::prelude::*;

    level
        .par_chunks_exact(2)
        .map(|pair| Node::combine(&pair[0], &pair[1]))
        .collect()
}

/// Build the tree over `records`.
pub fn build_tree<R: AsRef<[u8]>>(records: &[R]) -> Result<MerkleTree, MerkleError> {
    MerkleTree::build(records)
}

/// Compute the root committing to `records`.
pub fn compute_root<R: AsRef<[u8]>>(records: &[R]) -> Result<Hash256, MerkleError> {
    MerkleTree::build(records).map(|tree| tree.root())
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_core::pair_hash;

    fn txs(n: usize) -> Vec<Vec<u8>> {
        (1..=n).map(|i| format!("tx{i}").into_bytes()).collect()
    }

    fn h(s: &str) -> Hash256 {
        leaf_hash(s.as_bytes())
    }

    #[test]
    fn test_empty_input_rejected() {
        let empty: Vec<Vec<u8>> = vec![];
        assert_eq!(MerkleTree::build(&empty).unwrap_err(), MerkleError::EmptyInput);
        assert_eq!(compute_root(&empty).unwrap_err(), MerkleError::EmptyInput);
    }

    #[test]
    fn test_single_leaf_root_is_leaf_hash() {
        let tree = build_tree(&[b"only".to_vec()]).unwrap();
        assert_eq!(tree.root(), h("only"));
        assert_eq!(tree.flatten(), vec![Node::Present(h("only"))]);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.padded_width(), 1);
    }

    #[test]
    fn test_four_leaf_layout() {
        let tree = build_tree(&txs(4)).unwrap();
        let h12 = pair_hash(&h("tx1"), &h("tx2"));
        let h34 = pair_hash(&h("tx3"), &h("tx4"));
        let root = pair_hash(&h12, &h34);
        assert_eq!(
            tree.flatten(),
            vec![
                Node::Present(h("tx1")),
                Node::Present(h("tx2")),
                Node::Present(h("tx3")),
                Node::Present(h("tx4")),
                Node::Present(h12),
                Node::Present(h34),
                Node::Present(root),
            ]
        );
        assert_eq!(
            tree.root().to_hex(),
            "ea59a369466be42d1a4783f09ae0721a5a157d6dba9c4b053d407b5a4b9af145"
        );
    }

    #[test]
    fn test_five_leaf_duplication_cascades() {
        let tree = build_tree(&txs(5)).unwrap();
        let flat = tree.flatten();
        assert_eq!(flat.len(), 15);
        assert_eq!(tree.padded_width(), 8);
        assert_eq!(tree.height(), 3);

        // Leaf level: 5 present, 3 absent.
        assert!(flat[..5].iter().all(|n| !n.is_absent()));
        assert!(flat[5..8].iter().all(Node::is_absent));

        // Level 1: [h12, h34, h55, absent]
        let h5 = h("tx5");
        let h55 = pair_hash(&h5, &h5);
        assert_eq!(flat[10], Node::Present(h55));
        assert_eq!(flat[11], Node::Absent);

        // Level 2: [h1234, h(h55 || h55)]
        let h5555 = pair_hash(&h55, &h55);
        assert_eq!(flat[13], Node::Present(h5555));

        assert_eq!(
            tree.root().to_hex(),
            "e005b5664946b94dcae30e856ab0058930eb5ec65ca113c90331454335612140"
        );
    }

    #[test]
    fn test_three_leaves() {
        let tree = build_tree(&txs(3)).unwrap();
        let h12 = pair_hash(&h("tx1"), &h("tx2"));
        let h33 = pair_hash(&h("tx3"), &h("tx3"));
        assert_eq!(tree.root(), pair_hash(&h12, &h33));
    }

    #[test]
    fn test_flatten_length_is_two_p_minus_one() {
        for n in 1..=33 {
            let tree = build_tree(&txs(n)).unwrap();
            let p = n.next_power_of_two();
            assert_eq!(tree.flatten().len(), 2 * p - 1, "n={n}");
            assert_eq!(tree.flatten().last(), Some(&Node::Present(tree.root())));
        }
    }

    #[test]
    fn test_proof_path_four_leaves_index_one() {
        let tree = build_tree(&txs(4)).unwrap();
        let path = tree.proof_path(1).unwrap();
        assert_eq!(
            path,
            vec![h("tx1"), pair_hash(&h("tx3"), &h("tx4"))]
        );
    }

    #[test]
    fn test_proof_path_out_of_range() {
        let tree = build_tree(&txs(5)).unwrap();
        assert_eq!(
            tree.proof_path(5).unwrap_err(),
            MerkleError::IndexOutOfRange { index: 5, len: 5 }
        );
    }

    #[test]
    fn test_root_matches_compute_root() {
        let records = txs(9);
        assert_eq!(
            build_tree(&records).unwrap().root(),
            compute_root(&records).unwrap()
        );
    }
}
