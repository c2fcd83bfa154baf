//! Tree slots.

use attest_core::{pair_hash, Hash256};
use serde::{Deserialize, Serialize};

/// One slot of the tree array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    /// A computed digest.
    Present(Hash256),
    /// Padding past the last real leaf, and every parent of padding only.
    Absent,
}

impl Node {
    /// Combine a left and right child into their parent slot.
    pub fn combine(left: &Node, right: &Node) -> Node {
        match (left, right) {
            (Node::Absent, _) => Node::Absent,
            (Node::Present(l), Node::Absent) => Node::Present(pair_hash(l, l)),
            (Node::Present(l), Node::Present(r)) => Node::Present(pair_hash(l, r)),
        }
    }

    /// The digest, if present.
    pub fn digest(&self) -> Option<&Hash256> {
        match self {
            Node::Present(d) => Some(d),
            Node::Absent => None,
        }
    }

    /// Whether this slot is padding.
    pub fn is_absent(&self) -> bool {
        matches!(self, Node::Absent)
    }
}
