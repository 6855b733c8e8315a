//! Error types for [`LazySegmentTree`](crate::LazySegmentTree).

use std::fmt;

/// Convenience alias for results returned by tree operations.
pub type Result<T> = std::result::Result<T, SegmentTreeError>;

/// Errors reported synchronously by the public tree operations.
///
/// A call that returns an error has not touched any node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentTreeError {
    /// The tree was constructed from an empty sequence.
    InvalidInput,
    /// `[left, right)` is empty or reaches past the end of the sequence.
    InvalidRange {
        left: usize,
        right: usize,
        len: usize,
    },
}

impl fmt::Display for SegmentTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "segment tree requires at least one element"),
            Self::InvalidRange { left, right, len } => write!(
                f,
                "invalid range [{left}, {right}) for sequence of length {len}"
            ),
        }
    }
}

impl std::error::Error for SegmentTreeError {}

/// First broken invariant found by
/// [`LazySegmentTree::check_invariants`](crate::LazySegmentTree::check_invariants).
///
/// Every variant carries the `[lo, hi)` range of the offending node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A node with `lo >= hi`.
    EmptyNode { lo: usize, hi: usize },
    /// A leaf holding pending state or children.
    LeafNotClean { lo: usize, hi: usize },
    /// An internal node without children that is not covered by a pending set.
    MissingChildren { lo: usize, hi: usize },
    /// Children whose ranges are not the midpoint split of their parent.
    MisalignedChildren { lo: usize, hi: usize },
    /// A pending add of zero, which should have been dropped.
    ZeroAdd { lo: usize, hi: usize },
    /// A node whose aggregate disagrees with its children and pending state.
    StaleAggregate {
        lo: usize,
        hi: usize,
        expected: i64,
        actual: i64,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyNode { lo, hi } => write!(f, "node [{lo}, {hi}) covers no elements"),
            Self::LeafNotClean { lo, hi } => {
                write!(f, "leaf [{lo}, {hi}) holds pending state or children")
            }
            Self::MissingChildren { lo, hi } => write!(
                f,
                "node [{lo}, {hi}) has no children and no pending assignment"
            ),
            Self::MisalignedChildren { lo, hi } => {
                write!(f, "children of node [{lo}, {hi}) do not split it at the midpoint")
            }
            Self::ZeroAdd { lo, hi } => write!(f, "node [{lo}, {hi}) stores a pending add of 0"),
            Self::StaleAggregate {
                lo,
                hi,
                expected,
                actual,
            } => write!(
                f,
                "node [{lo}, {hi}) aggregate is {actual}, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
