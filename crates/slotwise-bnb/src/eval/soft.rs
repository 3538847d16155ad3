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

//! Soft constraints, raw tallies and weighting.
//!
//! Tallies are raw integer penalties (already multiplied by the per-rule
//! penalty). Weighting scales each category by its floating weight and
//! truncates toward zero, category by category, before summing.
//!
//! Two tallies exist. `SoftTally` is the literal score of an assignment and
//! feeds `eval_star`. `BoundTally` drops under-fill and counts a pairing
//! partner that is not yet placed as if it will land in a conflicting slot,
//! so it never decreases when the assignment grows and equals the literal
//! counterpart once the assignment is complete.
//!
//! All terms are non-negative and every sum and product saturates at
//! `i64::MAX`, so a saturated total is the same whatever order it was
//! accumulated in and incremental tallies still match full recomputation.

use crate::assignment::PartialAssignment;
use num_traits::ToPrimitive;
use slotwise_model::{
    config::{Penalties, Weights},
    index::{SessionIndex, SlotIndex},
    model::Model,
    solution::ScoreBreakdown,
};

/// Scales `raw` by `weight` and truncates toward zero, saturating at `i64::MAX`.
#[inline]
pub fn weigh(raw: i64, weight: f64) -> i64 {
    let scaled = raw.to_f64().unwrap_or(f64::MAX) * weight;
    num_traits::cast::<f64, i64>(scaled.trunc()).unwrap_or(i64::MAX)
}

/// Raw soft penalties of an assignment, per category.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SoftTally {
    pub under_fill: i64,
    pub preference: i64,
    pub pairing: i64,
    pub section_difference: i64,
}

impl SoftTally {
    /// Applies the category weights.
    pub fn weighted(&self, weights: &Weights) -> ScoreBreakdown {
        ScoreBreakdown {
            under_fill: weigh(self.under_fill, weights.min_filled),
            preference: weigh(self.preference, weights.pref),
            pairing: weigh(self.pairing, weights.pair),
            section_difference: weigh(self.section_difference, weights.sec_diff),
        }
    }
}

/// Raw penalties entering the pruning bound.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct BoundTally {
    pub preference: i64,
    pub pairing: i64,
    pub section_difference: i64,
}

impl BoundTally {
    /// The weighted bound score.
    #[inline]
    pub fn weighted(&self, weights: &Weights) -> i64 {
        weigh(self.preference, weights.pref)
            .saturating_add(weigh(self.pairing, weights.pair))
            .saturating_add(weigh(self.section_difference, weights.sec_diff))
    }
}

impl std::ops::Add for BoundTally {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            preference: self.preference.saturating_add(rhs.preference),
            pairing: self.pairing.saturating_add(rhs.pairing),
            section_difference: self
                .section_difference
                .saturating_add(rhs.section_difference),
        }
    }
}

impl std::fmt::Display for BoundTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BoundTally(preference: {}, pairing: {}, section difference: {})",
            self.preference, self.pairing, self.section_difference
        )
    }
}

#[inline]
fn preference_of(model: &Model, session: SessionIndex, slot: SlotIndex) -> i64 {
    match model.record(session).preference() {
        Some(p) if p.slot != slot => p.penalty,
        _ => 0,
    }
}

#[inline]
fn differs_in_section(model: &Model, a: SessionIndex, b: SessionIndex) -> bool {
    let (x, y) = (model.session(a), model.session(b));
    x.is_lecture() && y.is_lecture() && x.same_course(y) && x.section() != y.section()
}

fn under_fill(model: &Model, penalties: &Penalties, a: &PartialAssignment) -> i64 {
    model
        .slot_indices()
        .map(|slot| {
            let s = model.slot(slot);
            let occupancy = a.occupancy(slot) as i64;
            let min = i64::from(s.min());
            if occupancy >= min {
                return 0;
            }
            let rate = if s.is_lab() {
                penalties.lab_min
            } else {
                penalties.course_min
            };
            (min - occupancy).saturating_mul(rate)
        })
        .fold(0, i64::saturating_add)
}

fn section_difference(model: &Model, penalties: &Penalties, a: &PartialAssignment) -> i64 {
    model
        .slot_indices()
        .map(|slot| section_difference_in(model, penalties, a.occupants(slot)))
        .fold(0, i64::saturating_add)
}

fn section_difference_in(model: &Model, penalties: &Penalties, occupants: &[SessionIndex]) -> i64 {
    let mut total = 0;
    for (i, &x) in occupants.iter().enumerate() {
        for &y in &occupants[i + 1..] {
            if differs_in_section(model, x, y) {
                total = penalties.section.saturating_add(total);
            }
        }
    }
    total
}

/// Pairing term of `session` in `slot` towards `partner`, counting an unplaced
/// partner as if it will sit in one of the conflicting slots.
#[inline]
fn optimistic_pairing(
    model: &Model,
    a: &PartialAssignment,
    slot: SlotIndex,
    partner: SessionIndex,
) -> i64 {
    let conflicting = model.conflicting_slots(slot).len() as i64;
    let covered = match a.slot_of(partner) {
        Some(u) => i64::from(model.slots_conflict(slot, u)),
        None => 1,
    };
    conflicting - covered
}

/// The literal soft tally of `a`.
///
/// Pairing is counted per conflicting slot: for a session in slot `s`, every
/// slot overlapping `s` that does not hold a given partner adds one
/// `not_paired` penalty.
pub fn soft_tally(model: &Model, penalties: &Penalties, a: &PartialAssignment) -> SoftTally {
    let mut tally = SoftTally {
        under_fill: under_fill(model, penalties, a),
        ..SoftTally::default()
    };

    for (session, slot) in a.placements() {
        tally.preference = tally
            .preference
            .saturating_add(preference_of(model, session, slot));

        let partners = model.record(session).pairs();
        if partners.is_empty() {
            continue;
        }
        for &t in model.conflicting_slots(slot) {
            for &partner in partners {
                if a.slot_of(partner) != Some(t) {
                    tally.pairing = tally.pairing.saturating_add(penalties.not_paired);
                }
            }
        }
    }

    tally.section_difference = section_difference(model, penalties, a);
    tally
}

/// The bound tally of `a`, computed from scratch.
pub fn bound_tally(model: &Model, penalties: &Penalties, a: &PartialAssignment) -> BoundTally {
    let mut tally = BoundTally::default();
    for (session, slot) in a.placements() {
        tally.preference = tally
            .preference
            .saturating_add(preference_of(model, session, slot));
        for &partner in model.record(session).pairs() {
            let term = optimistic_pairing(model, a, slot, partner).saturating_mul(penalties.not_paired);
            tally.pairing = tally.pairing.saturating_add(term);
        }
    }
    tally.section_difference = section_difference(model, penalties, a);
    tally
}

/// The change of the bound tally caused by placing `session`.
///
/// `a` must already contain the placement. Adding the result to the parent's
/// tally yields `bound_tally(a)`.
pub fn bound_delta(
    model: &Model,
    penalties: &Penalties,
    a: &PartialAssignment,
    session: SessionIndex,
) -> BoundTally {
    let Some(slot) = a.slot_of(session) else {
        return BoundTally::default();
    };

    let preference = preference_of(model, session, slot);

    let mut pairing = 0;
    for &partner in model.record(session).pairs() {
        pairing += optimistic_pairing(model, a, slot, partner);
    }
    // Sessions waiting for this one drop their optimistic assumption.
    for &watcher in model.pair_watchers(session) {
        if let Some(t) = a.slot_of(watcher) {
            pairing += i64::from(!model.slots_conflict(t, slot));
        }
    }

    let section_difference = a
        .occupants(slot)
        .iter()
        .filter(|&&other| other != session && differs_in_section(model, session, other))
        .count() as i64;

    BoundTally {
        preference,
        pairing: pairing.saturating_mul(penalties.not_paired),
        section_difference: section_difference.saturating_mul(penalties.section),
    }
}
