// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Search frontiers
//!
//! The frontier holds the open leaves of the branch‑and‑bound tree and decides
//! which one is expanded next. Expanding a node removes it and inserts its
//! surviving children, so the frontier replaces the implicit "list of leaves"
//! with an explicit container.
//!
//! Policies
//! - `DepthFirstFrontier`: LIFO stack. Children are pushed so that the first
//!   candidate is expanded first, which reaches complete assignments quickly
//!   and keeps memory proportional to depth times branching factor.
//! - `BestFirstFrontier`: min‑heap on `(fbound, sequence)`. Expands the most
//!   promising node first; ties go to the older node.
//!
//! Both policies explore until exhaustion and report the same optimal score.

use crate::node::SearchNode;
use std::{cmp::Ordering, collections::BinaryHeap};

/// An ordered collection of open search nodes.
pub trait Frontier {
    /// Returns the name of the frontier policy.
    fn name(&self) -> &str;

    /// Inserts a single node.
    fn push(&mut self, node: SearchNode);

    /// Inserts the children of one expansion, given in candidate order.
    fn push_children(&mut self, children: Vec<SearchNode>) {
        for child in children {
            self.push(child);
        }
    }

    /// Removes the next node to expand.
    fn pop(&mut self) -> Option<SearchNode>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all nodes, keeping allocated capacity.
    fn clear(&mut self);
}

impl std::fmt::Debug for dyn Frontier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frontier({})", self.name())
    }
}

/// Depth-first frontier.
#[derive(Clone, Debug, Default)]
pub struct DepthFirstFrontier {
    stack: Vec<SearchNode>,
}

impl DepthFirstFrontier {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stack: Vec::with_capacity(capacity),
        }
    }
}

impl Frontier for DepthFirstFrontier {
    fn name(&self) -> &str {
        "DepthFirstFrontier"
    }

    #[inline]
    fn push(&mut self, node: SearchNode) {
        self.stack.push(node);
    }

    /// Pushes in reverse so the first child is on top.
    #[inline]
    fn push_children(&mut self, children: Vec<SearchNode>) {
        self.stack.extend(children.into_iter().rev());
    }

    #[inline]
    fn pop(&mut self) -> Option<SearchNode> {
        self.stack.pop()
    }

    #[inline]
    fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    fn clear(&mut self) {
        self.stack.clear();
    }
}

/// Heap entry ordering nodes so that `BinaryHeap` pops the smallest
/// `(fbound, sequence)` first.
#[derive(Debug)]
struct BestFirstEntry(SearchNode);

impl BestFirstEntry {
    #[inline]
    fn key(&self) -> (i64, u64) {
        (self.0.fbound(), self.0.sequence())
    }
}

impl PartialEq for BestFirstEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for BestFirstEntry {}

impl PartialOrd for BestFirstEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BestFirstEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Best-first frontier ordered by bound.
#[derive(Debug, Default)]
pub struct BestFirstFrontier {
    heap: BinaryHeap<BestFirstEntry>,
}

impl BestFirstFrontier {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The smallest bound among open nodes, a lower bound on any remaining solution.
    #[inline]
    pub fn peek_bound(&self) -> Option<i64> {
        self.heap.peek().map(|entry| entry.0.fbound())
    }
}

impl Frontier for BestFirstFrontier {
    fn name(&self) -> &str {
        "BestFirstFrontier"
    }

    #[inline]
    fn push(&mut self, node: SearchNode) {
        self.heap.push(BestFirstEntry(node));
    }

    #[inline]
    fn pop(&mut self) -> Option<SearchNode> {
        self.heap.pop().map(|entry| entry.0)
    }

    #[inline]
    fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assignment::PartialAssignment, eval::checker::Evaluation};

    fn node(fbound: i64, sequence: u64) -> SearchNode {
        SearchNode::new(
            PartialAssignment::new(1, 1),
            Evaluation::with_fbound(fbound),
            sequence,
        )
    }

    fn drain<F: Frontier>(frontier: &mut F) -> Vec<u64> {
        std::iter::from_fn(|| frontier.pop())
            .map(|n| n.sequence())
            .collect()
    }

    #[test]
    fn test_depth_first_expands_first_child_first() {
        let mut f = DepthFirstFrontier::new();
        f.push(node(0, 0));
        assert_eq!(f.pop().map(|n| n.sequence()), Some(0));

        f.push_children(vec![node(5, 1), node(1, 2), node(3, 3)]);
        assert_eq!(f.len(), 3);
        // A deeper expansion goes on top of the remaining siblings.
        let first = f.pop().unwrap();
        assert_eq!(first.sequence(), 1);
        f.push_children(vec![node(9, 4), node(9, 5)]);
        assert_eq!(drain(&mut f), vec![4, 5, 2, 3]);
        assert!(f.is_empty());
    }

    #[test]
    fn test_best_first_orders_by_bound_then_sequence() {
        let mut f = BestFirstFrontier::new();
        f.push_children(vec![node(5, 1), node(1, 2), node(3, 3), node(1, 4)]);
        assert_eq!(f.peek_bound(), Some(1));
        assert_eq!(drain(&mut f), vec![2, 4, 3, 1]);
        assert_eq!(f.peek_bound(), None);
    }

    #[test]
    fn test_clear_empties_the_frontier() {
        let mut dfs = DepthFirstFrontier::with_capacity(8);
        let mut bfs = BestFirstFrontier::new();
        for i in 0..4 {
            dfs.push(node(i, i as u64));
            bfs.push(node(i, i as u64));
        }
        dfs.clear();
        bfs.clear();
        assert!(dfs.is_empty());
        assert!(bfs.is_empty());
        assert_eq!(dfs.name(), "DepthFirstFrontier");
        assert_eq!(bfs.name(), "BestFirstFrontier");
    }
}
