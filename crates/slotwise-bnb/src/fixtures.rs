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

//! Shared builders for unit tests: slot shorthands, seeded random instances
//! and an exhaustive reference solver.

use crate::{assignment::PartialAssignment, eval::checker::ConstraintChecker, node::SearchNode};
use rand::{Rng, rngs::StdRng};
use slotwise_model::{
    config::ScoringConfig,
    index::{SessionIndex, SlotIndex},
    model::{Model, ModelBuilder},
    session::{Session, SessionKind},
    slot::Slot,
    time::{ClockTime, DaySet, TimeWindow},
};
use std::{
    io,
    sync::{Arc, Mutex},
};

pub fn window(days: DaySet, hour: u16, minute: u16, length: u16) -> TimeWindow {
    let start = ClockTime::new(hour, minute).unwrap();
    let end = ClockTime::from_minutes(start.minutes() + length).unwrap();
    TimeWindow::new(days, start, end)
}

/// A lecture slot; Tuesday/Thursday lectures run 75 minutes, others 60.
pub fn lecture_slot(days: DaySet, hour: u16, minute: u16, min: u32, max: u32) -> Slot {
    let length = if days == DaySet::TR { 75 } else { 60 };
    Slot::lecture(window(days, hour, minute, length), min, max)
}

/// A 60 minute lab slot.
pub fn lab_slot(days: DaySet, hour: u16, minute: u16, min: u32, max: u32) -> Slot {
    Slot::lab(window(days, hour, minute, 60), min, max)
}

const FACULTIES: [&str; 2] = ["CPSC", "SENG"];
const COURSES: [&str; 4] = ["231", "433", "501", "513"];
const HOURS: [u16; 4] = [8, 9, 11, 18];
const WEIGHTS: [f64; 5] = [0.0, 0.5, 1.0, 1.5, 2.0];

fn random_slot(rng: &mut StdRng, is_lab: bool) -> Slot {
    let days = if rng.random_bool(0.5) {
        DaySet::MWF
    } else {
        DaySet::TR
    };
    let hour = HOURS[rng.random_range(0..HOURS.len())];
    let minute = if rng.random_bool(0.3) { 30 } else { 0 };
    let min = rng.random_range(0..=1);
    let max = rng.random_range(1..=3);
    if is_lab {
        lab_slot(days, hour, minute, min, max)
    } else {
        lecture_slot(days, hour, minute, min, max)
    }
}

fn random_session(rng: &mut StdRng) -> Session {
    let faculty = FACULTIES[rng.random_range(0..FACULTIES.len())];
    let course = COURSES[rng.random_range(0..COURSES.len())];
    if rng.random_bool(0.6) {
        let section = [1, 2, 90][rng.random_range(0..3)];
        Session::lecture(faculty, course, section)
    } else {
        let kind = if rng.random_bool(0.5) {
            SessionKind::Lab
        } else {
            SessionKind::Tutorial
        };
        Session::lab(faculty, course, rng.random_range(1..=2), kind, 1)
    }
}

/// A random but always valid model with `num_sessions` sessions and
/// `num_slots` slots (at least one of each slot kind when `num_slots >= 2`).
pub fn random_model(rng: &mut StdRng, num_sessions: usize, num_slots: usize) -> Model {
    let mut b = ModelBuilder::new();

    let slots: Vec<Slot> = (0..num_slots)
        .map(|i| {
            let is_lab = match i {
                0 => false,
                1 => true,
                _ => rng.random_bool(0.5),
            };
            random_slot(rng, is_lab)
        })
        .collect();
    for slot in &slots {
        b.add_slot(*slot);
    }

    let sessions: Vec<Session> = (0..num_sessions).map(|_| random_session(rng)).collect();
    for session in &sessions {
        b.add_session(session.clone());
    }

    for (i, session) in sessions.iter().enumerate() {
        let x = SessionIndex::new(i);
        let candidates: Vec<SlotIndex> = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.accepts_kind_of(session))
            .map(|(j, _)| SlotIndex::new(j))
            .collect();

        let mut fixed = None;
        if !candidates.is_empty() && rng.random_bool(0.15) {
            let slot = candidates[rng.random_range(0..candidates.len())];
            b.set_fixed(x, slot);
            fixed = Some(slot);
        }
        if num_slots > 0 && rng.random_bool(0.3) {
            let slot = SlotIndex::new(rng.random_range(0..num_slots));
            b.set_preference(x, slot, rng.random_range(0..=10));
        }
        if num_slots > 0 && rng.random_bool(0.2) {
            let slot = SlotIndex::new(rng.random_range(0..num_slots));
            if fixed != Some(slot) {
                b.add_forbidden(x, slot);
            }
        }
        for j in (i + 1)..num_sessions {
            let y = SessionIndex::new(j);
            if rng.random_bool(0.15) {
                b.add_pair(x, y);
            }
            if rng.random_bool(0.1) {
                b.add_incompatible(x, y);
            }
        }
    }

    b.build().unwrap()
}

/// Random penalties in `0..=10` and weights from a small grid.
pub fn random_scoring(rng: &mut StdRng) -> ScoringConfig {
    fn pick(rng: &mut StdRng) -> f64 {
        WEIGHTS[rng.random_range(0..WEIGHTS.len())]
    }
    ScoringConfig::builder()
        .pen_coursemin(rng.random_range(0..=10))
        .pen_labsmin(rng.random_range(0..=10))
        .pen_notpaired(rng.random_range(0..=10))
        .pen_section(rng.random_range(0..=10))
        .w_minfilled(pick(rng))
        .w_pref(pick(rng))
        .w_pair(pick(rng))
        .w_secdiff(pick(rng))
        .build()
        .unwrap()
}

/// Enumerates every complete assignment over candidate slots in lexicographic
/// order and returns the first one with minimal `eval_star`.
pub fn brute_force(checker: &ConstraintChecker<'_>) -> Option<(i64, Vec<SlotIndex>)> {
    fn walk(
        checker: &ConstraintChecker<'_>,
        a: &PartialAssignment,
        best: &mut Option<(i64, Vec<SlotIndex>)>,
    ) {
        if a.is_complete() {
            if checker.is_feasible(a) {
                let score = checker.eval_star(a);
                if best.as_ref().is_none_or(|(b, _)| score < *b) {
                    *best = Some((score, a.to_slots().unwrap()));
                }
            }
            return;
        }
        let session = SessionIndex::new(a.num_placed());
        for &slot in checker.model().candidate_slots(session) {
            walk(checker, &a.with_placement(session, slot), best);
        }
    }

    let mut best = None;
    walk(
        checker,
        &PartialAssignment::empty_for(checker.model()),
        &mut best,
    );
    best
}

/// A one-lecture model with a single lecture slot, for monitor tests.
pub fn single_lecture_model() -> Model {
    let mut b = ModelBuilder::new();
    b.add_session(Session::lecture("CPSC", "231", 1));
    b.add_slot(lecture_slot(DaySet::MWF, 8, 0, 0, 2));
    b.build().unwrap()
}

/// The root node of `model` under the default scoring.
pub fn root_node(model: &Model) -> SearchNode {
    let checker = ConstraintChecker::new(model, ScoringConfig::default());
    let root = PartialAssignment::empty_for(model);
    let evaluation = checker.evaluate(&root);
    SearchNode::new(root, evaluation, 0)
}

/// An in-memory `tracing` writer whose clones share one buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

/// Runs `f` under a plain-text subscriber at `level` and returns its result
/// together with everything that was logged.
pub fn capture_traces<R>(level: tracing::Level, f: impl FnOnce() -> R) -> (R, String) {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}
