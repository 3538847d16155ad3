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

use crate::{assignment::PartialAssignment, eval::checker::Evaluation};

/// An open leaf of the search tree.
///
/// A node owns its assignment and the checker's cached evaluation of it.
/// The sequence number records creation order and breaks ties between nodes
/// of equal bound deterministically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchNode {
    assignment: PartialAssignment,
    evaluation: Evaluation,
    sequence: u64,
}

impl SearchNode {
    #[inline]
    pub fn new(assignment: PartialAssignment, evaluation: Evaluation, sequence: u64) -> Self {
        Self {
            assignment,
            evaluation,
            sequence,
        }
    }

    #[inline]
    pub fn assignment(&self) -> &PartialAssignment {
        &self.assignment
    }

    #[inline]
    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Number of placed sessions.
    #[inline]
    pub fn depth(&self) -> usize {
        self.assignment.num_placed()
    }

    #[inline]
    pub fn fbound(&self) -> i64 {
        self.evaluation.fbound()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.assignment.is_complete()
    }

    #[inline]
    pub fn into_assignment(self) -> PartialAssignment {
        self.assignment
    }
}

impl std::fmt::Display for SearchNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchNode(#{}, depth: {}, fbound: {})",
            self.sequence,
            self.depth(),
            self.fbound()
        )
    }
}
