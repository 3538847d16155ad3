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

use crate::{assignment::PartialAssignment, branching::SessionSelector};
use slotwise_model::{index::SessionIndex, model::Model};

/// Branches on sessions with a fixed slot first, then in input order.
///
/// A fixed session has exactly one feasible child, so placing these first
/// narrows every later branch without widening the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FixedFirstSelector;

impl FixedFirstSelector {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl SessionSelector for FixedFirstSelector {
    fn name(&self) -> &str {
        "FixedFirstSelector"
    }

    fn select(&mut self, model: &Model, assignment: &PartialAssignment) -> Option<SessionIndex> {
        assignment
            .unplaced()
            .find(|&s| model.record(s).fixed().is_some())
            .or_else(|| assignment.first_unplaced())
    }
}
