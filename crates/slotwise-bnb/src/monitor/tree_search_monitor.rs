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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait, `SearchCommand` and `PruneReason`
//! for observing and controlling branch‑and‑bound. Callbacks track the
//! solver lifecycle, and a monitor can stop the run via `SearchCommand`.
//!
//! Lifecycle
//! - enter → {step → command → prune | expand | solution}* → exit
//! - `BnbSolverStatistics` is provided to every callback.
//!
//! Methods take `&mut self`; monitors run on the solver thread. Keep
//! callbacks cheap, they sit in the inner loop.

use crate::{assignment::PartialAssignment, node::SearchNode, stats::BnbSolverStatistics};
use slotwise_model::{index::SessionIndex, model::Model, solution::Solution};

/// Instruction returned by a monitor at every step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Reasons for cutting an assignment from the search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// The assignment violates a hard constraint.
    Infeasible,
    /// The assignment's bound cannot beat the incumbent.
    BoundDominated,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
        }
    }
}

/// Trait for monitoring and controlling the search process of the solver.
pub trait TreeSearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, model: &Model, statistics: &BnbSolverStatistics);
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics);
    /// Called after `on_step` to decide whether the search goes on.
    fn search_command(
        &mut self,
        _node: &SearchNode,
        _statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called for every node taken from the frontier.
    fn on_step(&mut self, _node: &SearchNode, _statistics: &BnbSolverStatistics) {}
    /// Called after `node` was branched on `session`; `num_children` survived pruning.
    fn on_expand(
        &mut self,
        _node: &SearchNode,
        _session: SessionIndex,
        _num_children: usize,
        _statistics: &BnbSolverStatistics,
    ) {
    }
    /// Called when an assignment is cut from the search.
    fn on_prune(
        &mut self,
        _assignment: &PartialAssignment,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics,
    ) {
    }
    /// Called when a new best solution is found.
    fn on_solution_found(&mut self, solution: &Solution, statistics: &BnbSolverStatistics);
}

impl<M> TreeSearchMonitor for &mut M
where
    M: TreeSearchMonitor + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(&mut self, model: &Model, statistics: &BnbSolverStatistics) {
        (**self).on_enter_search(model, statistics)
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        (**self).on_exit_search(statistics)
    }

    fn search_command(
        &mut self,
        node: &SearchNode,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        (**self).search_command(node, statistics)
    }

    fn on_step(&mut self, node: &SearchNode, statistics: &BnbSolverStatistics) {
        (**self).on_step(node, statistics)
    }

    fn on_expand(
        &mut self,
        node: &SearchNode,
        session: SessionIndex,
        num_children: usize,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_expand(node, session, num_children, statistics)
    }

    fn on_prune(
        &mut self,
        assignment: &PartialAssignment,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_prune(assignment, reason, statistics)
    }

    fn on_solution_found(&mut self, solution: &Solution, statistics: &BnbSolverStatistics) {
        (**self).on_solution_found(solution, statistics)
    }
}

impl std::fmt::Debug for dyn TreeSearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
