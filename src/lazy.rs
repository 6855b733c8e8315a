//! Range max segment tree with lazy range assignment and range increment.
//!
//! Nodes live in a single arena. A node refers to its children by the arena
//! index of the left child; the right child is always stored right after it.
//!
//! # Invariants
//!
//! 1. Every node's `aggregate` is the max over its range once the pending
//!    state of all its ancestors has been applied. It never lags behind the
//!    node's own pending state.
//! 2. Leaves never hold pending state.
//! 3. An internal node without children carries a pending `Set`, so there is
//!    always something to forward when it is materialized.
//! 4. A pending add is never zero.

use std::iter;

use crate::error::{InvariantViolation, Result, SegmentTreeError};
use crate::pending::Pending;

/// Identity for max.
const NEG_INFINITY: i64 = i64::MIN;

const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct Node {
    lo: usize,
    hi: usize,
    aggregate: i64,
    pending: Pending,
    /// Arena index of the left child, `None` until materialized.
    children: Option<usize>,
}

impl Node {
    fn new(lo: usize, hi: usize, aggregate: i64) -> Self {
        Self {
            lo,
            hi,
            aggregate,
            pending: Pending::Clean,
            children: None,
        }
    }

    #[inline]
    fn is_leaf(&self) -> bool {
        self.hi - self.lo == 1
    }

    #[inline]
    fn mid(&self) -> usize {
        self.lo + (self.hi - self.lo) / 2
    }
}

/// Segment tree over a fixed-size sequence of `i64` supporting range max
/// query, range set and range add in `O(log n)`.
///
/// Every operation, including [`query`](Self::query), takes `&mut self`
/// because it may push pending updates down the tree. Wrap the whole tree in
/// a single lock to share it between threads.
///
/// ```
/// use segment_tree::LazySegmentTree;
///
/// let mut tree = LazySegmentTree::build(&[1, 2, 3, 4, 5])?;
/// tree.set_range(1, 4, 10)?;
/// assert_eq!(tree.query(0, 5)?, 10);
/// tree.add_range(2, 5, 3)?;
/// assert_eq!(tree.query(0, 5)?, 13);
/// assert_eq!(tree.query(4, 5)?, 8);
/// # Ok::<(), segment_tree::SegmentTreeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LazySegmentTree {
    len: usize,
    nodes: Vec<Node>,
}

impl LazySegmentTree {
    /// Builds the whole tree eagerly from `values`.
    ///
    /// Fails with [`SegmentTreeError::InvalidInput`] if `values` is empty.
    pub fn build(values: &[i64]) -> Result<Self> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("segtree_build", len = values.len()).entered();

        if values.is_empty() {
            return Err(SegmentTreeError::InvalidInput);
        }

        let len = values.len();
        let mut nodes = Vec::with_capacity(2 * len - 1);
        nodes.push(Node::new(0, len, NEG_INFINITY));
        let mut tree = Self { len, nodes };
        tree.build_node(ROOT, values);
        Ok(tree)
    }

    /// Creates a tree over `len` copies of `value`.
    ///
    /// Only the root is allocated up front; everything below it is
    /// materialized the first time an operation needs it.
    pub fn filled(len: usize, value: i64) -> Result<Self> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("segtree_build", len, value).entered();

        if len == 0 {
            return Err(SegmentTreeError::InvalidInput);
        }

        let mut root = Node::new(0, len, value);
        if !root.is_leaf() {
            root.pending = Pending::Set(value);
        }
        Ok(Self {
            len,
            nodes: vec![root],
        })
    }

    /// Number of elements in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a tree cannot be built over an empty sequence.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of nodes allocated so far.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Maximum over the whole sequence. O(1).
    #[inline]
    pub fn max(&self) -> i64 {
        self.nodes[ROOT].aggregate
    }

    /// Maximum over `[left, right)`.
    pub fn query(&mut self, left: usize, right: usize) -> Result<i64> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("segtree_query", left, right).entered();

        self.check_range(left, right)?;
        Ok(self.query_node(ROOT, left, right))
    }

    /// Current value at `index`.
    pub fn get(&mut self, index: usize) -> Result<i64> {
        self.query(index, index.saturating_add(1))
    }

    /// Assigns `value` to every element in `[left, right)`.
    pub fn set_range(&mut self, left: usize, right: usize, value: i64) -> Result<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("segtree_set", left, right, value).entered();

        self.check_range(left, right)?;
        self.update_node(ROOT, left, right, Pending::Set(value));
        Ok(())
    }

    /// Adds `delta` to every element in `[left, right)`.
    pub fn add_range(&mut self, left: usize, right: usize, delta: i64) -> Result<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("segtree_add", left, right, delta).entered();

        self.check_range(left, right)?;
        self.update_node(ROOT, left, right, Pending::add(delta));
        Ok(())
    }

    /// The full logical sequence, without pushing or allocating nodes.
    pub fn to_vec(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len);
        self.collect(ROOT, Pending::Clean, &mut out);
        out
    }

    /// Walks every materialized node and reports the first broken invariant.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantViolation> {
        self.check_node(ROOT)
    }

    fn check_range(&self, left: usize, right: usize) -> Result<()> {
        if left < right && right <= self.len {
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(left, right, len = self.len, "rejected range");

        Err(SegmentTreeError::InvalidRange {
            left,
            right,
            len: self.len,
        })
    }

    fn build_node(&mut self, node_idx: usize, values: &[i64]) -> i64 {
        let node = &self.nodes[node_idx];
        let aggregate = if node.is_leaf() {
            values[node.lo]
        } else {
            let left = self.alloc_children(node_idx);
            let l = self.build_node(left, values);
            let r = self.build_node(left + 1, values);
            l.max(r)
        };
        self.nodes[node_idx].aggregate = aggregate;
        aggregate
    }

    /// Appends the two children of `node_idx` to the arena and returns the
    /// index of the left one. Their aggregates are placeholders.
    fn alloc_children(&mut self, node_idx: usize) -> usize {
        let node = &self.nodes[node_idx];
        let (lo, mid, hi) = (node.lo, node.mid(), node.hi);
        let left = self.nodes.len();
        self.nodes.push(Node::new(lo, mid, NEG_INFINITY));
        self.nodes.push(Node::new(mid, hi, NEG_INFINITY));
        self.nodes[node_idx].children = Some(left);
        left
    }

    /// Applies `update` to the whole range of `node_idx`.
    fn modify_node_lazily(&mut self, node_idx: usize, update: Pending) {
        let node = &mut self.nodes[node_idx];
        node.aggregate = update.apply(node.aggregate);
        if !node.is_leaf() {
            node.pending = Pending::compose(update, node.pending);
        }
    }

    /// Forwards the pending update of an internal node to its children and
    /// returns the index of the left child.
    ///
    /// Children are only materialized when there is an update to forward.
    fn push(&mut self, node_idx: usize) -> usize {
        let pending = std::mem::take(&mut self.nodes[node_idx].pending);
        let left = match self.nodes[node_idx].children {
            Some(left) => left,
            None => {
                debug_assert!(
                    matches!(pending, Pending::Set(_)),
                    "unmaterialized node without pending set"
                );
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    lo = self.nodes[node_idx].lo,
                    hi = self.nodes[node_idx].hi,
                    "materializing children"
                );
                self.alloc_children(node_idx)
            }
        };
        if !pending.is_clean() {
            self.modify_node_lazily(left, pending);
            self.modify_node_lazily(left + 1, pending);
        }
        left
    }

    fn query_node(&mut self, node_idx: usize, left: usize, right: usize) -> i64 {
        let node = &self.nodes[node_idx];
        if right <= node.lo || node.hi <= left {
            return NEG_INFINITY;
        }
        if left <= node.lo && node.hi <= right {
            return node.aggregate;
        }
        let child = self.push(node_idx);
        let l = self.query_node(child, left, right);
        let r = self.query_node(child + 1, left, right);
        l.max(r)
    }

    fn update_node(&mut self, node_idx: usize, left: usize, right: usize, update: Pending) {
        let node = &self.nodes[node_idx];
        if right <= node.lo || node.hi <= left {
            return;
        }
        if left <= node.lo && node.hi <= right {
            self.modify_node_lazily(node_idx, update);
            return;
        }
        let child = self.push(node_idx);
        self.update_node(child, left, right, update);
        self.update_node(child + 1, left, right, update);
        self.nodes[node_idx].aggregate = self.nodes[child]
            .aggregate
            .max(self.nodes[child + 1].aggregate);
    }

    /// `inherited` is the composition of the pending updates of all
    /// ancestors, none of which has reached this node yet.
    fn collect(&self, node_idx: usize, inherited: Pending, out: &mut Vec<i64>) {
        let node = &self.nodes[node_idx];
        match node.children {
            Some(left) => {
                let inherited = Pending::compose(inherited, node.pending);
                self.collect(left, inherited, out);
                self.collect(left + 1, inherited, out);
            }
            // Leaf, or a whole range under one pending set.
            None => {
                let value = inherited.apply(node.aggregate);
                out.extend(iter::repeat(value).take(node.hi - node.lo));
            }
        }
    }

    fn check_node(&self, node_idx: usize) -> std::result::Result<(), InvariantViolation> {
        let node = &self.nodes[node_idx];
        let (lo, hi) = (node.lo, node.hi);
        if lo >= hi {
            return Err(InvariantViolation::EmptyNode { lo, hi });
        }
        if node.pending == Pending::Add(0) {
            return Err(InvariantViolation::ZeroAdd { lo, hi });
        }
        if node.is_leaf() {
            if !node.pending.is_clean() || node.children.is_some() {
                return Err(InvariantViolation::LeafNotClean { lo, hi });
            }
            return Ok(());
        }

        let Some(left) = node.children else {
            return match node.pending {
                Pending::Set(x) if x == node.aggregate => Ok(()),
                Pending::Set(x) => Err(InvariantViolation::StaleAggregate {
                    lo,
                    hi,
                    expected: x,
                    actual: node.aggregate,
                }),
                _ => Err(InvariantViolation::MissingChildren { lo, hi }),
            };
        };

        let (l, r) = (&self.nodes[left], &self.nodes[left + 1]);
        let mid = node.mid();
        if (l.lo, l.hi, r.lo, r.hi) != (lo, mid, mid, hi) {
            return Err(InvariantViolation::MisalignedChildren { lo, hi });
        }
        let expected = node.pending.apply(l.aggregate.max(r.aggregate));
        if expected != node.aggregate {
            return Err(InvariantViolation::StaleAggregate {
                lo,
                hi,
                expected,
                actual: node.aggregate,
            });
        }

        self.check_node(left)?;
        self.check_node(left + 1)
    }
}

impl TryFrom<&[i64]> for LazySegmentTree {
    type Error = SegmentTreeError;

    fn try_from(values: &[i64]) -> Result<Self> {
        Self::build(values)
    }
}

impl TryFrom<Vec<i64>> for LazySegmentTree {
    type Error = SegmentTreeError;

    fn try_from(values: Vec<i64>) -> Result<Self> {
        Self::build(&values)
    }
}
