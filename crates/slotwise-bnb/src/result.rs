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

use crate::stats::BnbSolverStatistics;
use slotwise_model::solution::Solution;

/// What the solver knows about the model when it stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult {
    /// We have proven that no complete assignment satisfies the hard constraints.
    Infeasible,
    /// We have found a solution and proven its optimality.
    Optimal(Solution),
    /// We have found a feasible solution, but not proven its optimality.
    Feasible(Solution),
    /// The solver stopped without a solution and without proving infeasibility.
    Unknown,
}

impl SolverResult {
    /// The reported solution, if any.
    #[inline]
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolverResult::Optimal(s) | SolverResult::Feasible(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(solution) => write!(f, "Optimal(score={})", solution.score()),
            SolverResult::Feasible(solution) => write!(f, "Feasible(score={})", solution.score()),
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The frontier was exhausted with a solution in hand.
    OptimalityProven,
    /// The frontier was exhausted without any solution.
    InfeasibilityProven,
    /// A monitor stopped the search; the string says why.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of the solver after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome {
    result: SolverResult,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
}

impl BnbSolverOutcome {
    #[inline]
    pub fn optimal(solution: Solution, statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Optimal(solution),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(solution: Option<Solution>, reason: R, statistics: BnbSolverStatistics) -> Self
    where
        R: Into<String>,
    {
        let result = match solution {
            Some(sol) => SolverResult::Feasible(sol),
            None => SolverResult::Unknown,
        };

        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult {
        &self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    #[inline]
    pub fn solution(&self) -> Option<&Solution> {
        self.result.solution()
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    /// Returns `true` if the model was proven to have no feasible complete assignment.
    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, SolverResult::Infeasible)
    }

    #[inline]
    pub fn into_result(self) -> SolverResult {
        self.result
    }
}

impl std::fmt::Display for BnbSolverOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result: {}", self.result)?;
        writeln!(f, "Termination: {}", self.termination_reason)?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotwise_model::{index::SlotIndex, solution::ScoreBreakdown};

    fn stats() -> BnbSolverStatistics {
        BnbSolverStatistics::default()
    }

    fn solution(score: i64) -> Solution {
        Solution::new(
            vec![SlotIndex::new(0)],
            ScoreBreakdown {
                preference: score,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_optimal_outcome() {
        let outcome = BnbSolverOutcome::optimal(solution(4), stats());
        assert!(outcome.is_optimal());
        assert_eq!(outcome.solution().map(|s| s.score()), Some(4));
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::OptimalityProven
        );
    }

    #[test]
    fn test_infeasible_outcome() {
        let outcome = BnbSolverOutcome::infeasible(stats());
        assert!(outcome.is_infeasible());
        assert!(outcome.solution().is_none());
        assert_eq!(format!("{}", outcome.result()), "Infeasible");
    }

    #[test]
    fn test_aborted_outcome_maps_missing_solution_to_unknown() {
        let outcome = BnbSolverOutcome::aborted(None, "node limit", stats());
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        match outcome.termination_reason() {
            TerminationReason::Aborted(msg) => assert_eq!(msg, "node limit"),
            _ => panic!("expected Aborted termination reason"),
        }

        let outcome = BnbSolverOutcome::aborted(Some(solution(2)), "time", stats());
        assert!(matches!(outcome.into_result(), SolverResult::Feasible(_)));
    }
}
