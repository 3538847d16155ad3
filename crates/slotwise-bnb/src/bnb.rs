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

//! Branch-and-bound engine for the timetabling problem.
//!
//! The `BnbSolver` owns a reusable frontier and drives an AND-tree search:
//! every open leaf holds a partial assignment, expanding a leaf branches one
//! unplaced session over its candidate slots, and children that are
//! infeasible or whose bound cannot beat the incumbent are discarded before
//! they reach the frontier. A search session object encapsulates per-run
//! state, statistics and timing, and the frontier is cleared after each solve.
//!
//! With a depth-first frontier and the input-order selector the search visits
//! complete assignments in lexicographic candidate order, and because the
//! incumbent is only replaced on strict improvement the reported solution is
//! the first optimal assignment in that order.

use crate::{
    assignment::PartialAssignment,
    branching::SessionSelector,
    eval::{
        checker::{ConstraintChecker, Evaluation},
        validation,
    },
    frontier::{DepthFirstFrontier, Frontier},
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::SearchNode,
    result::{BnbSolverOutcome, TerminationReason},
    stats::BnbSolverStatistics,
};
use slotwise_model::{
    config::ScoringConfig,
    index::{SessionIndex, SlotIndex},
    model::Model,
    solution::Solution,
};

/// A branch and bound solver over slot assignments.
///
/// The frontier type decides the exploration order; see
/// [`DepthFirstFrontier`] and [`crate::frontier::BestFirstFrontier`].
/// Session selection and run control are supplied per solve as a
/// [`SessionSelector`] and a [`TreeSearchMonitor`].
#[derive(Debug, Clone)]
pub struct BnbSolver<F = DepthFirstFrontier>
where
    F: Frontier,
{
    frontier: F,
}

impl Default for BnbSolver<DepthFirstFrontier> {
    fn default() -> Self {
        Self::new()
    }
}

impl BnbSolver<DepthFirstFrontier> {
    /// Creates a depth-first solver.
    #[inline]
    pub fn new() -> Self {
        Self {
            frontier: DepthFirstFrontier::new(),
        }
    }
}

impl<F> BnbSolver<F>
where
    F: Frontier,
{
    /// Creates a solver exploring leaves in the order of `frontier`.
    /// The frontier is cleared before use.
    #[inline]
    pub fn with_frontier(mut frontier: F) -> Self {
        frontier.clear();
        Self { frontier }
    }

    /// Returns the frontier used by this solver.
    #[inline]
    pub fn frontier(&self) -> &F {
        &self.frontier
    }

    /// Solves `model` under `config`.
    ///
    /// This variant does not use a shared incumbent and thus acts as a
    /// standalone solver.
    #[inline]
    pub fn solve<S, M>(
        &mut self,
        model: &Model,
        config: ScoringConfig,
        selector: &mut S,
        monitor: M,
    ) -> BnbSolverOutcome
    where
        S: SessionSelector,
        M: TreeSearchMonitor,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(model, config, selector, monitor, backing)
    }

    /// Solves `model` under `config`, pruning against `incumbent`.
    ///
    /// Improving solutions are published to `incumbent`, and bounds found by
    /// other solvers sharing it tighten this run. If the shared incumbent
    /// already holds an optimal solution the run proves it and reports it.
    #[inline]
    pub fn solve_with_incumbent<S, M>(
        &mut self,
        model: &Model,
        config: ScoringConfig,
        selector: &mut S,
        monitor: M,
        incumbent: &SharedIncumbent,
    ) -> BnbSolverOutcome
    where
        S: SessionSelector,
        M: TreeSearchMonitor,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(model, config, selector, monitor, backing)
    }

    fn solve_internal<S, M, I>(
        &mut self,
        model: &Model,
        config: ScoringConfig,
        selector: &mut S,
        mut monitor: M,
        backing: I,
    ) -> BnbSolverOutcome
    where
        S: SessionSelector,
        M: TreeSearchMonitor,
        I: IncumbentStore,
    {
        let checker = ConstraintChecker::new(model, config);

        debug_assert!(
            validation::is_monotone_bound_exhaustive(
                &ConstraintChecker::new(model, config.with_trace_violations(false)),
                10_000
            ),
            "called `BnbSolver::solve` with a model whose bound is not monotone under extension"
        );

        self.frontier.clear();
        let session = BnbSolverSearchSession::new(
            &mut self.frontier,
            checker,
            selector,
            &mut monitor,
            backing,
        );
        let outcome = session.run();
        self.reset();
        outcome
    }

    #[inline]
    fn reset(&mut self) {
        self.frontier.clear();
    }
}

/// Builds and evaluates the child of `parent` that places `session` in each of `candidates`.
/// Children come back in candidate order.
#[cfg(not(feature = "parallel"))]
fn evaluate_children(
    checker: &ConstraintChecker<'_>,
    parent: &SearchNode,
    session: SessionIndex,
    candidates: &[SlotIndex],
) -> Vec<(PartialAssignment, Evaluation)> {
    candidates
        .iter()
        .map(|&slot| evaluate_child(checker, parent, session, slot))
        .collect()
}

/// Builds and evaluates the child of `parent` that places `session` in each of `candidates`.
/// Children come back in candidate order.
#[cfg(feature = "parallel")]
fn evaluate_children(
    checker: &ConstraintChecker<'_>,
    parent: &SearchNode,
    session: SessionIndex,
    candidates: &[SlotIndex],
) -> Vec<(PartialAssignment, Evaluation)> {
    use rayon::prelude::*;

    candidates
        .par_iter()
        .map(|&slot| evaluate_child(checker, parent, session, slot))
        .collect()
}

#[inline]
fn evaluate_child(
    checker: &ConstraintChecker<'_>,
    parent: &SearchNode,
    session: SessionIndex,
    slot: SlotIndex,
) -> (PartialAssignment, Evaluation) {
    let child = parent.assignment().with_placement(session, slot);
    let evaluation = checker.evaluate_child(parent.evaluation(), &child, session);
    (child, evaluation)
}

struct BnbSolverSearchSession<'a, F, S, M, I>
where
    F: Frontier,
    I: IncumbentStore,
{
    frontier: &'a mut F,
    checker: ConstraintChecker<'a>,
    selector: &'a mut S,
    monitor: &'a mut M,
    incumbent: I,
    best_score: Option<i64>,
    best_solution: Option<Solution>,
    next_sequence: u64,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<'a, F, S, M, I> std::fmt::Debug for BnbSolverSearchSession<'a, F, S, M, I>
where
    F: Frontier,
    I: IncumbentStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("frontier", &self.frontier.name())
            .field("frontier_len", &self.frontier.len())
            .field("best_score", &self.best_score)
            .field("best_solution", &self.best_solution)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, F, S, M, I> BnbSolverSearchSession<'a, F, S, M, I>
where
    F: Frontier,
    S: SessionSelector,
    M: TreeSearchMonitor,
    I: IncumbentStore,
{
    #[inline]
    fn new(
        frontier: &'a mut F,
        checker: ConstraintChecker<'a>,
        selector: &'a mut S,
        monitor: &'a mut M,
        incumbent_backing: I,
    ) -> Self {
        let best_score = incumbent_backing.initial_upper_bound();
        Self {
            frontier,
            checker,
            selector,
            monitor,
            incumbent: incumbent_backing,
            best_score,
            best_solution: None,
            next_sequence: 0,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome {
        let model = self.checker.model();
        self.monitor.on_enter_search(model, &self.stats);
        tracing::debug!(
            sessions = model.num_sessions(),
            slots = model.num_slots(),
            frontier = self.frontier.name(),
            selector = self.selector.name(),
            monitor = self.monitor.name(),
            "branch and bound started"
        );

        self.push_root();

        let termination_reason = loop {
            self.best_score = self.incumbent.tighten(self.best_score);

            let node = match self.frontier.pop() {
                Some(node) => node,
                None => {
                    break if self.best_score.is_some() {
                        TerminationReason::OptimalityProven
                    } else {
                        TerminationReason::InfeasibilityProven
                    };
                }
            };

            self.stats.on_node_explored();
            self.stats.on_depth_update(node.depth() as u64);
            self.monitor.on_step(&node, &self.stats);

            if let SearchCommand::Terminate(msg) = self.monitor.search_command(&node, &self.stats)
            {
                break TerminationReason::Aborted(msg);
            }

            self.process(node);
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        tracing::debug!(
            reason = %termination_reason,
            nodes = self.stats.nodes_explored,
            best = ?self.best_score,
            "branch and bound finished"
        );
        self.finalize_result(termination_reason)
    }

    /// Picks the better of the local incumbent and the shared snapshot,
    /// preferring the local one on ties.
    fn best_available_solution(&mut self) -> Option<Solution> {
        let local = self.best_solution.take();
        match (local, self.incumbent.snapshot()) {
            (Some(local), Some(shared)) if shared.score() < local.score() => Some(shared),
            (Some(local), _) => Some(local),
            (None, shared) => shared,
        }
    }

    fn finalize_result(mut self, reason: TerminationReason) -> BnbSolverOutcome {
        let solution = self.best_available_solution();
        match reason {
            TerminationReason::OptimalityProven => match solution {
                Some(solution) => BnbSolverOutcome::optimal(solution, self.stats),
                None => BnbSolverOutcome::infeasible(self.stats),
            },
            TerminationReason::InfeasibilityProven => BnbSolverOutcome::infeasible(self.stats),
            TerminationReason::Aborted(msg) => BnbSolverOutcome::aborted(solution, msg, self.stats),
        }
    }

    /// Whether a node bounded below by `bound` cannot beat the incumbent.
    #[inline]
    fn is_dominated(&self, bound: i64) -> bool {
        match self.best_score {
            Some(best) => bound >= best,
            None => false,
        }
    }

    #[inline]
    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    fn push_root(&mut self) {
        let root = PartialAssignment::empty_for(self.checker.model());
        let evaluation = self.checker.evaluate(&root);
        if !evaluation.is_feasible() {
            self.prune(&root, PruneReason::Infeasible);
            return;
        }
        let sequence = self.next_sequence();
        self.frontier.push(SearchNode::new(root, evaluation, sequence));
        self.stats.on_frontier_size(self.frontier.len());
    }

    #[inline]
    fn prune(&mut self, assignment: &PartialAssignment, reason: PruneReason) {
        match reason {
            PruneReason::Infeasible => self.stats.on_pruning_infeasible(),
            PruneReason::BoundDominated => self.stats.on_pruning_bound(),
        }
        self.monitor.on_prune(assignment, reason, &self.stats);
    }

    fn process(&mut self, node: SearchNode) {
        // The incumbent may have improved since the node was queued.
        if self.is_dominated(node.fbound()) {
            self.prune(node.assignment(), PruneReason::BoundDominated);
            return;
        }

        if node.is_complete() {
            self.handle_complete_assignment(node);
        } else {
            self.expand(node);
        }
    }

    fn handle_complete_assignment(&mut self, node: SearchNode) {
        let breakdown = self.checker.breakdown(node.assignment());
        let score = breakdown.total();
        if self.is_dominated(score) {
            self.prune(node.assignment(), PruneReason::BoundDominated);
            return;
        }

        let slots = match node.into_assignment().to_slots() {
            Some(slots) => slots,
            None => return,
        };
        let solution = Solution::new(slots, breakdown);

        self.best_score = Some(score);
        self.stats.on_solution_found();
        self.incumbent.on_solution_found(&solution);
        self.monitor.on_solution_found(&solution, &self.stats);
        tracing::debug!(
            score,
            nodes = self.stats.nodes_explored,
            "new incumbent"
        );
        self.best_solution = Some(solution);
    }

    fn expand(&mut self, node: SearchNode) {
        let model = self.checker.model();
        let session = match self.selector.select(model, node.assignment()) {
            Some(session) => session,
            None => return,
        };

        debug_assert!(
            !node.assignment().is_placed(session),
            "called `BnbSolverSearchSession::expand` with selector `{}` returning the placed session {}",
            self.selector.name(),
            session
        );

        self.stats.on_expansion();
        let candidates = model.candidate_slots(session);
        let evaluated = evaluate_children(&self.checker, &node, session, candidates);

        let mut children = Vec::with_capacity(evaluated.len());
        for (child, evaluation) in evaluated {
            self.stats.on_child_generated();
            if !evaluation.is_feasible() {
                self.prune(&child, PruneReason::Infeasible);
                continue;
            }
            if self.is_dominated(evaluation.fbound()) {
                self.prune(&child, PruneReason::BoundDominated);
                continue;
            }
            let sequence = self.next_sequence();
            children.push(SearchNode::new(child, evaluation, sequence));
        }

        let num_children = children.len();
        self.frontier.push_children(children);
        self.stats.on_frontier_size(self.frontier.len());
        self.monitor
            .on_expand(&node, session, num_children, &self.stats);
        tracing::trace!(
            session = %session,
            depth = node.depth(),
            candidates = candidates.len(),
            children = num_children,
            frontier = self.frontier.len(),
            "expanded"
        );
    }
}
