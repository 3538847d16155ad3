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

//! Session selection for timetabling search
//!
//! At every expansion the solver asks a `SessionSelector` which unplaced
//! session to branch on next; the node then gets one child per candidate slot
//! of that session. Selectors must be deterministic so that repeated runs on
//! the same model report the same solution.
//!
//! Provided selectors:
//! - `input_order`: the lowest-indexed unplaced session (default).
//! - `fixed_first`: sessions with a fixed slot first, then input order.

pub mod fixed_first;
pub mod input_order;

use crate::assignment::PartialAssignment;
use slotwise_model::{index::SessionIndex, model::Model};

/// Chooses the session to branch on.
pub trait SessionSelector {
    /// Returns the name of the selector.
    fn name(&self) -> &str;

    /// Returns the next unplaced session, or `None` if `assignment` is complete.
    fn select(&mut self, model: &Model, assignment: &PartialAssignment) -> Option<SessionIndex>;
}

impl std::fmt::Debug for dyn SessionSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionSelector({})", self.name())
    }
}

impl std::fmt::Display for dyn SessionSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionSelector({})", self.name())
    }
}
