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
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    node::SearchNode,
    stats::BnbSolverStatistics,
};
use slotwise_model::{model::Model, solution::Solution};
use std::time::{Duration, Instant};

/// A monitor that terminates the search after a specified duration.
///
/// Checks the clock only every `check_interval` nodes to minimize overhead.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    ops_since_last_check: u64,
}

impl TimeLimitMonitor {
    /// Creates a new `TimeLimitMonitor`.
    /// `check_interval` is the number of steps between clock reads; a higher
    /// value lowers overhead but may overshoot the limit slightly.
    pub fn new(duration: Duration, check_interval: u64) -> Self {
        Self {
            time_limit: duration,
            start_time: None,
            check_interval: check_interval.max(1),
            ops_since_last_check: 0,
        }
    }

    /// Creates a new `TimeLimitMonitor` that reads the clock every 10,000 steps.
    pub fn with_default_check_interval(duration: Duration) -> Self {
        Self::new(duration, 10_000)
    }

    #[inline]
    fn limit_exceeded(&self) -> bool {
        match self.start_time {
            Some(start) => start.elapsed() > self.time_limit,
            None => false,
        }
    }
}

impl TreeSearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model, _statistics: &BnbSolverStatistics) {
        self.start_time = Some(Instant::now());
        self.ops_since_last_check = 0;
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {
        self.start_time = None;
    }

    fn search_command(
        &mut self,
        _node: &SearchNode,
        _statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        self.ops_since_last_check = self.ops_since_last_check.saturating_add(1);
        if self.ops_since_last_check < self.check_interval {
            return SearchCommand::Continue;
        }
        self.ops_since_last_check = 0;

        if self.limit_exceeded() {
            return SearchCommand::Terminate(format!(
                "Time limit of {:.3} seconds exceeded",
                self.time_limit.as_secs_f64()
            ));
        }
        SearchCommand::Continue
    }

    fn on_solution_found(&mut self, _solution: &Solution, _statistics: &BnbSolverStatistics) {}
}
