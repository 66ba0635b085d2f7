//! Builder shorthands for ergonomic tree construction.
//!
//! Instead of writing verbose `Box::new(Sequence::new(...))` chains, trees
//! can be assembled from these free functions.

use crate::behaviour::Node;
use crate::behaviours::Count;
use crate::composite::{Parallel, ParallelPolicy, Selector, Sequence};

/// Creates a sequence node.
///
/// Shorthand for `Box::new(Sequence::new(name, children))`.
#[inline]
pub fn sequence(name: impl Into<String>, children: Vec<Node>) -> Node {
    Box::new(Sequence::new(name, children))
}

/// Creates a selector node.
///
/// Shorthand for `Box::new(Selector::new(name, children))`.
#[inline]
pub fn selector(name: impl Into<String>, children: Vec<Node>) -> Node {
    Box::new(Selector::new(name, children))
}

/// Creates a parallel node with the given combination policy.
///
/// Shorthand for `Box::new(Parallel::new(name, policy, children))`.
#[inline]
pub fn parallel(name: impl Into<String>, policy: ParallelPolicy, children: Vec<Node>) -> Node {
    Box::new(Parallel::new(name, policy, children))
}

/// Creates a counting leaf.
///
/// Shorthand for `Box::new(Count::new(...))`.
#[inline]
pub fn count(
    name: impl Into<String>,
    fail_until: u64,
    running_until: u64,
    success_until: u64,
) -> Node {
    Box::new(Count::new(name, fail_until, running_until, success_until))
}
