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

/// Terminates the search once more than `max_nodes` nodes were explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLimitMonitor {
    max_nodes: u64,
}

impl NodeLimitMonitor {
    #[inline]
    pub fn new(max_nodes: u64) -> Self {
        Self { max_nodes }
    }

    #[inline]
    pub fn max_nodes(&self) -> u64 {
        self.max_nodes
    }
}

impl TreeSearchMonitor for NodeLimitMonitor {
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model, _statistics: &BnbSolverStatistics) {}

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    #[inline]
    fn search_command(
        &mut self,
        _node: &SearchNode,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if statistics.nodes_explored > self.max_nodes {
            SearchCommand::Terminate(format!("Node limit of {} reached", self.max_nodes))
        } else {
            SearchCommand::Continue
        }
    }

    fn on_solution_found(&mut self, _solution: &Solution, _statistics: &BnbSolverStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{root_node, single_lecture_model};

    #[test]
    fn test_terminates_past_the_limit() {
        let model = single_lecture_model();
        let node = root_node(&model);
        let mut monitor = NodeLimitMonitor::new(3);
        let mut stats = BnbSolverStatistics::default();

        for _ in 0..3 {
            stats.on_node_explored();
            assert_eq!(monitor.search_command(&node, &stats), SearchCommand::Continue);
        }
        stats.on_node_explored();
        assert_eq!(
            monitor.search_command(&node, &stats),
            SearchCommand::Terminate("Node limit of 3 reached".to_string())
        );
    }
}
