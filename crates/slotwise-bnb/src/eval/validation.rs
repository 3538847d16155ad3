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

//! Validation helpers for the pruning bound.
//!
//! Pruning is only sound if `fbound` never decreases when an assignment is
//! extended and never exceeds `eval_star` of a complete assignment. The
//! harness here walks the assignment tree from the empty assignment, placing
//! sessions in index order across all their candidate slots (feasible or
//! not), and checks both properties plus the agreement of the incremental
//! evaluation with a full one. The walk stops after `max_nodes` assignments,
//! so on larger models it is a sampled check rather than a proof.
//!
//! The solver runs this in debug builds before every search.

use crate::{assignment::PartialAssignment, eval::checker::ConstraintChecker};
use slotwise_model::index::SessionIndex;

/// Returns `true` if no bound defect is found among the first `max_nodes`
/// assignments of a depth-first walk.
pub fn is_monotone_bound_exhaustive(checker: &ConstraintChecker<'_>, max_nodes: usize) -> bool {
    let model = checker.model();
    let root = PartialAssignment::empty_for(model);
    let root_eval = checker.evaluate(&root);

    let mut stack = vec![(root, root_eval)];
    let mut visited = 0usize;

    while let Some((assignment, evaluation)) = stack.pop() {
        visited += 1;
        if visited > max_nodes {
            break;
        }

        if assignment.is_complete() {
            let eval_star = checker.eval_star(&assignment);
            if evaluation.fbound() > eval_star {
                tracing::warn!(
                    fbound = evaluation.fbound(),
                    eval_star,
                    "bound exceeds the score of a complete assignment"
                );
                return false;
            }
            continue;
        }

        let session = SessionIndex::new(assignment.num_placed());
        for &slot in model.candidate_slots(session) {
            let child = assignment.with_placement(session, slot);
            let child_eval = checker.evaluate_child(&evaluation, &child, session);
            if child_eval.fbound() < evaluation.fbound() {
                tracing::warn!(
                    parent = evaluation.fbound(),
                    child = child_eval.fbound(),
                    "bound decreased when placing {} in {}",
                    session,
                    slot
                );
                return false;
            }
            if child_eval.tally() != checker.evaluate(&child).tally() {
                return false;
            }
            stack.push((child, child_eval));
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{random_model, random_scoring};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_bound_is_monotone_on_random_models() {
        let mut rng = StdRng::seed_from_u64(0x5107);
        for _ in 0..20 {
            let model = random_model(&mut rng, 4, 4);
            let config = random_scoring(&mut rng);
            let checker = ConstraintChecker::new(&model, config);
            assert!(is_monotone_bound_exhaustive(&checker, 5_000));
        }
    }

    #[test]
    fn test_empty_model_is_trivially_valid() {
        let model = slotwise_model::model::ModelBuilder::new().build().unwrap();
        let checker = ConstraintChecker::new(&model, Default::default());
        assert!(is_monotone_bound_exhaustive(&checker, 10));
    }
}
