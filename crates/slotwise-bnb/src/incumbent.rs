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

//! Incumbent management for branch‑and‑bound
//!
//! `IncumbentStore` is the solver's view of the best known score (upper
//! bound): it seeds the bound, tightens it during search and receives every
//! improving solution.
//!
//! Implementations
//! - `NoSharedIncumbent`: local only. `initial_upper_bound = None`,
//!   `tighten(x) = x`, and `on_solution_found` is a no‑op.
//! - `SharedIncumbentAdapter<'a>`: wraps a `SharedIncumbent` so several solver
//!   runs (threads) prune against each other's solutions, or a run is warm
//!   started with a known timetable.
//!
//! `SharedIncumbent` keeps the score in an `AtomicI64` for lock‑free reads and
//! the solution behind a `Mutex`, which is the source of truth. A candidate is
//! installed only if it is strictly better than the current one.
//!
//! Upper bounds are `Option<i64>`; `None` means no solution is known, so
//! every score including `i64::MAX` is a valid incumbent.

use slotwise_model::solution::Solution;
use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, AtomicI64, Ordering},
};

/// The solver's access to the best known solution.
pub trait IncumbentStore {
    /// The upper bound the search starts with.
    fn initial_upper_bound(&self) -> Option<i64>;
    /// Combines the local best score with whatever is known elsewhere.
    fn tighten(&self, current_local_best: Option<i64>) -> Option<i64>;
    /// Publishes an improving solution.
    fn on_solution_found(&self, solution: &Solution);
    /// The best solution held by the store, if it holds any.
    fn snapshot(&self) -> Option<Solution>;
}

/// An incumbent store that shares nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSharedIncumbent;

impl NoSharedIncumbent {
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl IncumbentStore for NoSharedIncumbent {
    #[inline(always)]
    fn initial_upper_bound(&self) -> Option<i64> {
        None
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: Option<i64>) -> Option<i64> {
        current_local_best
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Solution) {}

    #[inline(always)]
    fn snapshot(&self) -> Option<Solution> {
        None
    }
}

/// A concurrent holder for the best solution found so far.
///
/// The bound is stored before `installed` is set with `Release`, and read
/// after loading `installed` with `Acquire`. It only serves to skip hopeless
/// candidates without locking. The mutex guards the solution and decides
/// installation.
#[derive(Debug)]
pub struct SharedIncumbent {
    upper_bound: AtomicI64,
    installed: AtomicBool,
    solution: Mutex<Option<Solution>>,
}

impl Default for SharedIncumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SharedIncumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.upper_bound() {
            Some(bound) => write!(f, "Incumbent(upper_bound: {})", bound),
            None => write!(f, "Incumbent(upper_bound: none)"),
        }
    }
}

impl SharedIncumbent {
    /// Creates a shared incumbent with no solution installed.
    #[inline]
    pub fn new() -> Self {
        Self {
            upper_bound: AtomicI64::new(i64::MAX),
            installed: AtomicBool::new(false),
            solution: Mutex::new(None),
        }
    }

    /// Creates a shared incumbent already holding `solution`.
    pub fn with_solution(solution: Solution) -> Self {
        Self {
            upper_bound: AtomicI64::new(solution.score()),
            installed: AtomicBool::new(true),
            solution: Mutex::new(Some(solution)),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, Option<Solution>> {
        self.solution.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current upper bound, or `None` before the first install.
    #[inline]
    pub fn upper_bound(&self) -> Option<i64> {
        if self.installed.load(Ordering::Acquire) {
            Some(self.upper_bound.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Returns a clone of the current incumbent, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Solution> {
        self.lock().clone()
    }

    /// Installs `candidate` if it is strictly better than the incumbent.
    /// Returns `true` if it was installed.
    pub fn try_install(&self, candidate: &Solution) -> bool {
        let score = candidate.score();
        if let Some(bound) = self.upper_bound() {
            if score >= bound {
                return false;
            }
        }

        let mut guard = self.lock();
        // The hint may be stale; compare against the guarded solution.
        if let Some(current) = guard.as_ref() {
            if score >= current.score() {
                return false;
            }
        }

        *guard = Some(candidate.clone());
        self.upper_bound.store(score, Ordering::Relaxed);
        self.installed.store(true, Ordering::Release);
        true
    }
}

/// Lets a solver run prune against a `SharedIncumbent`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy)]
pub struct SharedIncumbentAdapter<'a> {
    inner: &'a SharedIncumbent,
}

impl<'a> SharedIncumbentAdapter<'a> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent) -> Self {
        Self { inner }
    }
}

impl IncumbentStore for SharedIncumbentAdapter<'_> {
    #[inline(always)]
    fn initial_upper_bound(&self) -> Option<i64> {
        self.inner.upper_bound()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: Option<i64>) -> Option<i64> {
        match (self.inner.upper_bound(), current_local_best) {
            (Some(shared), Some(local)) => Some(shared.min(local)),
            (shared, local) => shared.or(local),
        }
    }

    #[inline(always)]
    fn on_solution_found(&self, solution: &Solution) {
        self.inner.try_install(solution);
    }

    #[inline]
    fn snapshot(&self) -> Option<Solution> {
        self.inner.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotwise_model::{index::SlotIndex, solution::ScoreBreakdown};

    fn make_solution(score: i64, n: usize) -> Solution {
        Solution::new(
            (0..n).map(SlotIndex::new).collect(),
            ScoreBreakdown {
                pairing: score,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_no_shared_incumbent_is_passthrough() {
        let store = NoSharedIncumbent::new();
        assert_eq!(store.initial_upper_bound(), None);
        for val in [None, Some(0), Some(42), Some(i64::MAX)] {
            assert_eq!(store.tighten(val), val);
        }
        store.on_solution_found(&make_solution(3, 1));
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_try_install_requires_strict_improvement() {
        let shared = SharedIncumbent::new();
        assert_eq!(shared.upper_bound(), None);
        assert!(shared.snapshot().is_none());

        assert!(shared.try_install(&make_solution(120, 2)));
        assert_eq!(shared.upper_bound(), Some(120));
        assert!(!shared.try_install(&make_solution(120, 3)));
        assert!(!shared.try_install(&make_solution(130, 3)));
        assert_eq!(shared.snapshot().unwrap().num_sessions(), 2);

        assert!(shared.try_install(&make_solution(90, 4)));
        assert_eq!(shared.upper_bound(), Some(90));
    }

    #[test]
    fn test_saturated_score_is_a_real_incumbent() {
        let shared = SharedIncumbent::new();
        assert!(shared.try_install(&make_solution(i64::MAX, 1)));
        assert_eq!(shared.upper_bound(), Some(i64::MAX));
        assert_eq!(
            SharedIncumbentAdapter::new(&shared).tighten(None),
            Some(i64::MAX)
        );
        assert_eq!(format!("{}", shared), format!("Incumbent(upper_bound: {})", i64::MAX));
    }

    #[test]
    fn test_adapter_reads_and_publishes() {
        let shared = SharedIncumbent::with_solution(make_solution(200, 1));
        let adapter = SharedIncumbentAdapter::new(&shared);

        assert_eq!(adapter.initial_upper_bound(), Some(200));
        assert_eq!(adapter.tighten(Some(350)), Some(200));
        assert_eq!(adapter.tighten(Some(150)), Some(150));
        assert_eq!(adapter.tighten(None), Some(200));

        adapter.on_solution_found(&make_solution(95, 4));
        assert_eq!(shared.upper_bound(), Some(95));
        assert_eq!(adapter.snapshot().map(|s| s.score()), Some(95));
    }

    #[test]
    fn test_concurrent_installs_keep_the_minimum() {
        let shared = SharedIncumbent::new();
        std::thread::scope(|scope| {
            for t in 0..4i64 {
                let shared = &shared;
                scope.spawn(move || {
                    for k in (0..50i64).rev() {
                        shared.try_install(&make_solution(k * 4 + t, 1));
                    }
                });
            }
        });
        assert_eq!(shared.upper_bound(), Some(0));
        assert_eq!(shared.snapshot().map(|s| s.score()), Some(0));
    }
}
