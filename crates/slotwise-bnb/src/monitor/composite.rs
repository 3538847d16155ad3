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

//! Monitoring combinators for tree search
//!
//! Provides `CompositeTreeSearchMonitor`, a fan‑out monitor that forwards every
//! event to its children, so logging and stop conditions can be mixed freely.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short‑circuits on the first non‑`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    assignment::PartialAssignment,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::SearchNode,
    stats::BnbSolverStatistics,
};
use slotwise_model::{index::SessionIndex, model::Model, solution::Solution};

/// A tree search monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeTreeSearchMonitor<'a> {
    monitors: Vec<Box<dyn TreeSearchMonitor + 'a>>,
}

impl<'a> Default for CompositeTreeSearchMonitor<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompositeTreeSearchMonitor<'a> {
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeTreeSearchMonitor` with room for `capacity` monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns a slice of the monitors contained in the composite monitor.
    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn TreeSearchMonitor + 'a>] {
        &self.monitors
    }

    /// Removes all monitors.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.monitors.clear();
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a> FromIterator<Box<dyn TreeSearchMonitor + 'a>> for CompositeTreeSearchMonitor<'a> {
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a> TreeSearchMonitor for CompositeTreeSearchMonitor<'a> {
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, model: &Model, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(model, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        node: &SearchNode,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        for monitor in &mut self.monitors {
            let cmd = monitor.search_command(node, statistics);
            if !matches!(cmd, SearchCommand::Continue) {
                return cmd;
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, node: &SearchNode, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_step(node, statistics);
        }
    }

    #[inline(always)]
    fn on_expand(
        &mut self,
        node: &SearchNode,
        session: SessionIndex,
        num_children: usize,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_expand(node, session, num_children, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        assignment: &PartialAssignment,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_prune(assignment, reason, statistics);
        }
    }

    #[inline(always)]
    fn on_solution_found(&mut self, solution: &Solution, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(solution, statistics);
        }
    }
}

impl<'a> std::fmt::Debug for CompositeTreeSearchMonitor<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.monitors.iter().map(|m| m.name()).collect();
        f.debug_struct("CompositeTreeSearchMonitor")
            .field("monitors", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{root_node, single_lecture_model};
    use std::{cell::RefCell, rc::Rc};

    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        command: SearchCommand,
    }

    impl Recorder {
        fn new(label: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                label,
                log: Rc::clone(log),
                command: SearchCommand::Continue,
            }
        }

        fn terminating(mut self, reason: &str) -> Self {
            self.command = SearchCommand::Terminate(reason.to_string());
            self
        }
    }

    impl TreeSearchMonitor for Recorder {
        fn name(&self) -> &str {
            self.label
        }

        fn on_enter_search(&mut self, _model: &Model, _statistics: &BnbSolverStatistics) {
            self.log.borrow_mut().push(format!("{}:enter", self.label));
        }

        fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {
            self.log.borrow_mut().push(format!("{}:exit", self.label));
        }

        fn search_command(
            &mut self,
            _node: &SearchNode,
            _statistics: &BnbSolverStatistics,
        ) -> SearchCommand {
            self.log.borrow_mut().push(format!("{}:command", self.label));
            self.command.clone()
        }

        fn on_prune(
            &mut self,
            _assignment: &PartialAssignment,
            reason: PruneReason,
            _statistics: &BnbSolverStatistics,
        ) {
            self.log
                .borrow_mut()
                .push(format!("{}:prune:{}", self.label, reason));
        }

        fn on_solution_found(&mut self, _solution: &Solution, _statistics: &BnbSolverStatistics) {
            self.log.borrow_mut().push(format!("{}:solution", self.label));
        }
    }

    #[test]
    fn test_events_fan_out_in_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut composite = CompositeTreeSearchMonitor::new();
        composite.add_monitor(Recorder::new("a", &log));
        composite.add_monitor_boxed(Box::new(Recorder::new("b", &log)));
        assert_eq!(composite.len(), 2);

        let model = single_lecture_model();
        let stats = BnbSolverStatistics::default();
        composite.on_enter_search(&model, &stats);
        let node = root_node(&model);
        composite.on_prune(node.assignment(), PruneReason::Infeasible, &stats);
        composite.on_exit_search(&stats);

        assert_eq!(
            *log.borrow(),
            vec![
                "a:enter",
                "b:enter",
                "a:prune:Infeasible",
                "b:prune:Infeasible",
                "a:exit",
                "b:exit"
            ]
        );
    }

    #[test]
    fn test_search_command_short_circuits() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let monitors: Vec<Box<dyn TreeSearchMonitor>> = vec![
            Box::new(Recorder::new("a", &log)),
            Box::new(Recorder::new("b", &log).terminating("stop")),
            Box::new(Recorder::new("c", &log)),
        ];
        let mut composite: CompositeTreeSearchMonitor = monitors.into_iter().collect();

        let model = single_lecture_model();
        let node = root_node(&model);
        let cmd = composite.search_command(&node, &BnbSolverStatistics::default());

        assert_eq!(cmd, SearchCommand::Terminate("stop".to_string()));
        assert_eq!(*log.borrow(), vec!["a:command", "b:command"]);
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeTreeSearchMonitor::default();
        assert!(composite.is_empty());
        let model = single_lecture_model();
        let node = root_node(&model);
        assert_eq!(
            composite.search_command(&node, &BnbSolverStatistics::default()),
            SearchCommand::Continue
        );
        assert_eq!(
            format!("{:?}", composite),
            "CompositeTreeSearchMonitor { monitors: [] }"
        );
    }
}
