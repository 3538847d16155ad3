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

//! The constraint checker.
//!
//! `ConstraintChecker` binds a `Model` to a `ScoringConfig` and exposes the
//! feasibility verdict, the full soft score (`eval_star`) and the pruning bound
//! (`fbound`) of any partial assignment. All methods are pure: results are
//! returned as fresh values, the search caches them on its nodes as an
//! `Evaluation`.
//!
//! Children are evaluated incrementally from their parent's `Evaluation`.
//! In debug builds the incremental bound is compared against a full
//! recomputation.

use crate::{
    assignment::PartialAssignment,
    eval::{
        hard::{self, HardViolation},
        soft::{self, BoundTally, SoftTally},
    },
};
use slotwise_model::{
    config::ScoringConfig, index::SessionIndex, model::Model, solution::ScoreBreakdown,
};

/// Cached checker results of one search node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Evaluation {
    feasible: bool,
    tally: BoundTally,
    fbound: i64,
}

impl Evaluation {
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Raw bound tallies; the base for evaluating children incrementally.
    #[inline]
    pub fn tally(&self) -> &BoundTally {
        &self.tally
    }

    /// The weighted bound score.
    #[inline]
    pub fn fbound(&self) -> i64 {
        self.fbound
    }

    #[cfg(test)]
    pub(crate) fn with_fbound(fbound: i64) -> Self {
        Self {
            feasible: true,
            tally: BoundTally::default(),
            fbound,
        }
    }
}

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Evaluation(feasible: {}, fbound: {})",
            self.feasible, self.fbound
        )
    }
}

/// Evaluates hard and soft constraints of partial assignments against one model.
#[derive(Clone, Copy, Debug)]
pub struct ConstraintChecker<'m> {
    model: &'m Model,
    config: ScoringConfig,
}

impl<'m> ConstraintChecker<'m> {
    #[inline]
    pub fn new(model: &'m Model, config: ScoringConfig) -> Self {
        Self { model, config }
    }

    #[inline]
    pub fn model(&self) -> &'m Model {
        self.model
    }

    #[inline]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    #[inline]
    fn trace(&self, violation: Option<HardViolation>) -> Option<HardViolation> {
        if self.config.trace_violations() {
            if let Some(v) = &violation {
                tracing::debug!(rule = v.rule(), "hard constraint violated: {}", v);
            }
        }
        violation
    }

    /// The first violated hard constraint, in rule order.
    #[inline]
    pub fn first_violation(&self, a: &PartialAssignment) -> Option<HardViolation> {
        self.trace(hard::first_violation(self.model, a))
    }

    #[inline]
    pub fn is_feasible(&self, a: &PartialAssignment) -> bool {
        self.first_violation(a).is_none()
    }

    /// Checks only the constraints involving `session`, which `a` must contain.
    #[inline]
    pub fn violation_after_placing(
        &self,
        a: &PartialAssignment,
        session: SessionIndex,
    ) -> Option<HardViolation> {
        self.trace(hard::violation_after_placing(self.model, a, session))
    }

    /// Raw, unweighted soft penalties.
    #[inline]
    pub fn soft_tally(&self, a: &PartialAssignment) -> SoftTally {
        soft::soft_tally(self.model, self.config.penalties(), a)
    }

    /// Weighted soft penalties per category.
    #[inline]
    pub fn breakdown(&self, a: &PartialAssignment) -> ScoreBreakdown {
        self.soft_tally(a).weighted(self.config.weights())
    }

    /// The full weighted soft score. Meaningful once `a` is complete.
    #[inline]
    pub fn eval_star(&self, a: &PartialAssignment) -> i64 {
        self.breakdown(a).total()
    }

    #[inline]
    pub fn bound_tally(&self, a: &PartialAssignment) -> BoundTally {
        soft::bound_tally(self.model, self.config.penalties(), a)
    }

    /// The pruning bound: weighted preference, pairing and section difference.
    /// Never decreases when `a` is extended and never exceeds `eval_star` of a completion.
    #[inline]
    pub fn fbound(&self, a: &PartialAssignment) -> i64 {
        self.bound_tally(a).weighted(self.config.weights())
    }

    /// Evaluates `a` from scratch.
    pub fn evaluate(&self, a: &PartialAssignment) -> Evaluation {
        let tally = self.bound_tally(a);
        Evaluation {
            feasible: self.is_feasible(a),
            tally,
            fbound: tally.weighted(self.config.weights()),
        }
    }

    /// Evaluates `child`, which is the parent assignment plus `placed`.
    ///
    /// The feasibility verdict only covers constraints involving `placed`,
    /// so it is exact when the parent was feasible.
    pub fn evaluate_child(
        &self,
        parent: &Evaluation,
        child: &PartialAssignment,
        placed: SessionIndex,
    ) -> Evaluation {
        let feasible = self.violation_after_placing(child, placed).is_none();
        let tally =
            *parent.tally() + soft::bound_delta(self.model, self.config.penalties(), child, placed);

        debug_assert_eq!(
            tally,
            self.bound_tally(child),
            "called `ConstraintChecker::evaluate_child` with an incremental bound that differs from the full recomputation"
        );

        Evaluation {
            feasible,
            tally,
            fbound: tally.weighted(self.config.weights()),
        }
    }
}
