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

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, node::SearchNode, stats::BnbSolverStatistics,
};
use slotwise_model::{model::Model, solution::Solution};
use std::time::{Duration, Instant};

/// Emits a progress line through `tracing` at most once per `log_interval`.
///
/// The clock is read only when `nodes_explored & clock_check_mask == 0`.
#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_score: Option<i64>,
}

impl LogTreeSearchMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_score: None,
        }
    }

    /// The best score reported to this monitor during the current search.
    #[inline]
    pub fn best_score(&self) -> Option<i64> {
        self.best_score
    }

    fn log_line(&mut self, node: &SearchNode, stats: &BnbSolverStatistics) {
        let now = Instant::now();
        let best = match self.best_score {
            Some(score) => score.to_string(),
            None => "inf".to_string(),
        };
        tracing::info!(
            elapsed_secs = now.duration_since(self.start_time).as_secs_f64(),
            nodes = stats.nodes_explored,
            depth = node.depth(),
            best = %best,
            bound = node.fbound(),
            pruned_infeasible = stats.prunings_infeasible,
            pruned_bound = stats.prunings_bound,
            "search progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogTreeSearchMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogTreeSearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {:.3}s, clock_check_mask: {})",
            self.log_interval.as_secs_f64(),
            self.clock_check_mask
        )
    }
}

impl TreeSearchMonitor for LogTreeSearchMonitor {
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, model: &Model, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_score = None;
        tracing::info!(
            sessions = model.num_sessions(),
            slots = model.num_slots(),
            "search started"
        );
    }

    fn on_step(&mut self, node: &SearchNode, statistics: &BnbSolverStatistics) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(node, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution, statistics: &BnbSolverStatistics) {
        self.best_score = Some(solution.score());
        tracing::info!(
            score = solution.score(),
            nodes = statistics.nodes_explored,
            "new incumbent"
        );
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        tracing::info!(
            nodes = statistics.nodes_explored,
            solutions = statistics.solutions_found,
            elapsed_secs = self.start_time.elapsed().as_secs_f64(),
            "search finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{SharedBuffer, root_node, single_lecture_model};
    use slotwise_model::{index::SlotIndex, solution::ScoreBreakdown};

    #[test]
    fn test_logs_lifecycle_and_progress() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let model = single_lecture_model();
        let node = root_node(&model);
        let mut stats = BnbSolverStatistics::default();
        let mut monitor = LogTreeSearchMonitor::new(Duration::ZERO, 0);

        tracing::subscriber::with_default(subscriber, || {
            monitor.on_enter_search(&model, &stats);
            stats.on_node_explored();
            monitor.on_step(&node, &stats);
            let solution = Solution::new(vec![SlotIndex::new(0)], ScoreBreakdown::default());
            monitor.on_solution_found(&solution, &stats);
            monitor.on_exit_search(&stats);
        });

        let out = buffer.contents();
        assert!(out.contains("search started"));
        assert!(out.contains("search progress"));
        assert!(out.contains("new incumbent"));
        assert!(out.contains("search finished"));
        assert_eq!(monitor.best_score(), Some(0));
    }

    #[test]
    fn test_enter_resets_best_score() {
        let model = single_lecture_model();
        let stats = BnbSolverStatistics::default();
        let mut monitor = LogTreeSearchMonitor::default();
        let solution = Solution::new(vec![SlotIndex::new(0)], ScoreBreakdown::default());
        monitor.on_solution_found(&solution, &stats);
        assert_eq!(monitor.best_score(), Some(0));
        monitor.on_enter_search(&model, &stats);
        assert_eq!(monitor.best_score(), None);
    }
}
