//! Lazy-propagation segment tree over a fixed-size sequence of `i64`.
//!
//! [`LazySegmentTree`] answers range maximum queries and applies range
//! assignments and range increments in `O(log n)`. Updates covering a whole
//! node are recorded there and only pushed to the children when a later
//! operation needs to look below it. An assignment overrides any pending
//! increment; an increment arriving after a pending assignment adjusts the
//! assigned value.
//!
//! Enable the `tracing` feature for spans around every operation.

mod error;
mod lazy;
mod pending;

pub use error::{InvariantViolation, Result, SegmentTreeError};
pub use lazy::LazySegmentTree;
