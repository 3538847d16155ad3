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

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use slotwise_bnb::{
    bnb::BnbSolver,
    branching::{fixed_first::FixedFirstSelector, input_order::InputOrderSelector},
    frontier::BestFirstFrontier,
    monitor::no_op::NoOperationMonitor,
};
use slotwise_model::{
    config::ScoringConfig,
    index::SessionIndex,
    model::{Model, ModelBuilder},
    session::{Session, SessionKind},
    slot::Slot,
    time::{ClockTime, DaySet, TimeWindow},
};
use std::hint::black_box;

fn slot(days: DaySet, hour: u16, lab: bool) -> Slot {
    let start = ClockTime::new(hour, 0).unwrap();
    let length = if days == DaySet::TR && !lab { 75 } else { 60 };
    let end = ClockTime::from_minutes(start.minutes() + length).unwrap();
    let window = TimeWindow::new(days, start, end);
    if lab {
        Slot::lab(window, 0, 3)
    } else {
        Slot::lecture(window, 1, 3)
    }
}

/// A department-sized instance: a few courses with lectures, labs,
/// preferences and lab pairings, on a fixed weekly grid.
fn instance(seed: u64, num_courses: usize) -> Model {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = ModelBuilder::new();

    let mut lecture_slots = Vec::new();
    for hour in [8, 10, 13, 15] {
        lecture_slots.push(b.add_slot(slot(DaySet::MWF, hour, false)));
        lecture_slots.push(b.add_slot(slot(DaySet::TR, hour, false)));
    }
    for hour in [9, 14] {
        b.add_slot(slot(DaySet::MWF, hour, true));
    }

    let mut previous: Option<SessionIndex> = None;
    for course in 0..num_courses {
        let number = format!("{}", 200 + course * 10);
        let lecture = b.add_session(Session::lecture("CPSC", number.clone(), 1));
        let lab = b.add_session(Session::lab("CPSC", number, 1, SessionKind::Lab, 1));
        b.add_pair(lecture, lab);

        let preferred = lecture_slots[rng.random_range(0..lecture_slots.len())];
        b.set_preference(lecture, preferred, rng.random_range(1..=5));
        if let Some(prev) = previous {
            if rng.random_bool(0.5) {
                b.add_incompatible(prev, lecture);
            }
        }
        previous = Some(lecture);
    }

    b.build().unwrap()
}

fn config() -> ScoringConfig {
    ScoringConfig::builder()
        .pen_coursemin(2)
        .pen_labsmin(1)
        .pen_notpaired(3)
        .pen_section(4)
        .build()
        .unwrap()
}

fn bench_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("bnb_benchmark");
    group.sample_size(20);

    for num_courses in [2usize, 3, 4] {
        let model = instance(0xC0FFEE, num_courses);
        let config = config();
        group.throughput(Throughput::Elements(model.num_sessions() as u64));

        group.bench_with_input(
            BenchmarkId::new("depth_first", num_courses),
            &model,
            |bench, model| {
                let mut solver = BnbSolver::new();
                bench.iter(|| {
                    let outcome = solver.solve(
                        black_box(model),
                        config,
                        &mut InputOrderSelector::new(),
                        NoOperationMonitor::new(),
                    );
                    black_box(outcome)
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("best_first", num_courses),
            &model,
            |bench, model| {
                let mut solver = BnbSolver::with_frontier(BestFirstFrontier::new());
                bench.iter(|| {
                    let outcome = solver.solve(
                        black_box(model),
                        config,
                        &mut InputOrderSelector::new(),
                        NoOperationMonitor::new(),
                    );
                    black_box(outcome)
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("fixed_first", num_courses),
            &model,
            |bench, model| {
                let mut solver = BnbSolver::new();
                bench.iter(|| {
                    let outcome = solver.solve(
                        black_box(model),
                        config,
                        &mut FixedFirstSelector::new(),
                        NoOperationMonitor::new(),
                    );
                    black_box(outcome)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_solvers);
criterion_main!(benches);
