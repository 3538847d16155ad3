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

//! Hard constraints.
//!
//! Eight rules decide feasibility. They are checked in a fixed order and the
//! first failure is reported as a `HardViolation`:
//!
//! 1. capacity: no slot holds more than `max` sessions,
//! 2. a lecture and a lab/tutorial of its section do not overlap,
//! 3. incompatible sessions do not overlap,
//! 4. a session with a fixed slot sits in it,
//! 5. no session sits in a forbidden slot,
//! 6. lectures of evening sections (>= 90) start at or after 18:00, others before,
//! 7. two 500-level lectures never share a slot,
//! 8. no lecture sits in the reserved Tuesday 11:00 lecture slot.
//!
//! `violation_after_placing` re-checks only the rules that involve one newly
//! placed session. Applied to a child of a feasible parent it agrees with
//! `first_violation` on whether the child is feasible.

use crate::assignment::PartialAssignment;
use slotwise_model::{
    index::{SessionIndex, SlotIndex},
    model::Model,
};

/// A failed hard constraint, naming the sessions and slot involved.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum HardViolation {
    CapacityExceeded {
        slot: SlotIndex,
        occupancy: usize,
        max: u32,
    },
    SectionOverlap {
        lecture: SessionIndex,
        lab: SessionIndex,
    },
    Incompatible {
        first: SessionIndex,
        second: SessionIndex,
    },
    NotInFixedSlot {
        session: SessionIndex,
        fixed: SlotIndex,
        actual: SlotIndex,
    },
    ForbiddenSlot {
        session: SessionIndex,
        slot: SlotIndex,
    },
    EveningSplit {
        session: SessionIndex,
        slot: SlotIndex,
    },
    FiveHundredLevelClash {
        first: SessionIndex,
        second: SessionIndex,
        slot: SlotIndex,
    },
    ReservedTuesdaySlot {
        session: SessionIndex,
        slot: SlotIndex,
    },
}

impl HardViolation {
    /// Short name of the violated rule.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => "capacity",
            Self::SectionOverlap { .. } => "section-lab-overlap",
            Self::Incompatible { .. } => "incompatible",
            Self::NotInFixedSlot { .. } => "fixed-slot",
            Self::ForbiddenSlot { .. } => "forbidden-slot",
            Self::EveningSplit { .. } => "evening-split",
            Self::FiveHundredLevelClash { .. } => "500-level",
            Self::ReservedTuesdaySlot { .. } => "tuesday-11",
        }
    }
}

impl std::fmt::Display for HardViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityExceeded {
                slot,
                occupancy,
                max,
            } => write!(f, "{} holds {} sessions, max is {}", slot, occupancy, max),
            Self::SectionOverlap { lecture, lab } => {
                write!(f, "lecture {} overlaps its lab {}", lecture, lab)
            }
            Self::Incompatible { first, second } => {
                write!(f, "incompatible {} and {} overlap", first, second)
            }
            Self::NotInFixedSlot {
                session,
                fixed,
                actual,
            } => write!(f, "{} is fixed to {} but placed in {}", session, fixed, actual),
            Self::ForbiddenSlot { session, slot } => {
                write!(f, "{} is placed in forbidden {}", session, slot)
            }
            Self::EveningSplit { session, slot } => {
                write!(f, "{} violates the evening split in {}", session, slot)
            }
            Self::FiveHundredLevelClash {
                first,
                second,
                slot,
            } => write!(f, "500-level {} and {} share {}", first, second, slot),
            Self::ReservedTuesdaySlot { session, slot } => {
                write!(f, "lecture {} is placed in reserved {}", session, slot)
            }
        }
    }
}

#[inline]
fn capacity(model: &Model, a: &PartialAssignment, slot: SlotIndex) -> Option<HardViolation> {
    let occupancy = a.occupancy(slot);
    let max = model.slot(slot).max();
    (occupancy > max as usize).then_some(HardViolation::CapacityExceeded {
        slot,
        occupancy,
        max,
    })
}

#[inline]
fn section_overlap(
    model: &Model,
    a: &PartialAssignment,
    session: SessionIndex,
    slot: SlotIndex,
) -> Option<HardViolation> {
    let is_lecture = model.session(session).is_lecture();
    model
        .section_siblings(session)
        .iter()
        .copied()
        .find(|&other| {
            a.slot_of(other)
                .is_some_and(|t| model.slots_conflict(slot, t))
        })
        .map(|other| {
            let (lecture, lab) = if is_lecture {
                (session, other)
            } else {
                (other, session)
            };
            HardViolation::SectionOverlap { lecture, lab }
        })
}

#[inline]
fn incompatible(
    model: &Model,
    a: &PartialAssignment,
    session: SessionIndex,
    slot: SlotIndex,
    only_later: bool,
) -> Option<HardViolation> {
    model
        .record(session)
        .incompatible_sessions()
        .filter(|other| !only_later || *other > session)
        .find(|&other| {
            a.slot_of(other)
                .is_some_and(|t| model.slots_conflict(slot, t))
        })
        .map(|other| HardViolation::Incompatible {
            first: session.min(other),
            second: session.max(other),
        })
}

#[inline]
fn fixed(model: &Model, session: SessionIndex, slot: SlotIndex) -> Option<HardViolation> {
    model
        .record(session)
        .fixed_slots()
        .iter()
        .copied()
        .find(|&f| f != slot)
        .map(|fixed| HardViolation::NotInFixedSlot {
            session,
            fixed,
            actual: slot,
        })
}

#[inline]
fn forbidden(model: &Model, session: SessionIndex, slot: SlotIndex) -> Option<HardViolation> {
    model
        .record(session)
        .is_forbidden(slot)
        .then_some(HardViolation::ForbiddenSlot { session, slot })
}

#[inline]
fn evening_split(model: &Model, session: SessionIndex, slot: SlotIndex) -> Option<HardViolation> {
    let s = model.session(session);
    let t = model.slot(slot);
    let violated = s.is_lecture() && !t.is_lab() && s.is_evening_section() != t.starts_in_evening();
    violated.then_some(HardViolation::EveningSplit { session, slot })
}

#[inline]
fn is_500_level_lecture(model: &Model, session: SessionIndex) -> bool {
    let s = model.session(session);
    s.is_lecture() && s.is_500_level()
}

fn five_hundred_level_in_slot(
    model: &Model,
    a: &PartialAssignment,
    slot: SlotIndex,
) -> Option<HardViolation> {
    let mut seniors = a
        .occupants(slot)
        .iter()
        .copied()
        .filter(|&s| is_500_level_lecture(model, s));
    let first = seniors.next()?;
    let second = seniors.next()?;
    Some(HardViolation::FiveHundredLevelClash {
        first: first.min(second),
        second: first.max(second),
        slot,
    })
}

#[inline]
fn reserved_tuesday(
    model: &Model,
    session: SessionIndex,
    slot: SlotIndex,
) -> Option<HardViolation> {
    let violated =
        model.session(session).is_lecture() && model.slot(slot).is_reserved_tuesday_lecture_slot();
    violated.then_some(HardViolation::ReservedTuesdaySlot { session, slot })
}

/// Returns the first violated hard constraint of `a`, checking the rules in order.
pub fn first_violation(model: &Model, a: &PartialAssignment) -> Option<HardViolation> {
    if let Some(v) = model.slot_indices().find_map(|slot| capacity(model, a, slot)) {
        return Some(v);
    }
    if let Some(v) = a.placements().find_map(|(session, slot)| {
        model
            .session(session)
            .is_lecture()
            .then(|| section_overlap(model, a, session, slot))
            .flatten()
    }) {
        return Some(v);
    }
    if let Some(v) = a
        .placements()
        .find_map(|(session, slot)| incompatible(model, a, session, slot, true))
    {
        return Some(v);
    }
    if let Some(v) = a
        .placements()
        .find_map(|(session, slot)| fixed(model, session, slot))
    {
        return Some(v);
    }
    if let Some(v) = a
        .placements()
        .find_map(|(session, slot)| forbidden(model, session, slot))
    {
        return Some(v);
    }
    if let Some(v) = a
        .placements()
        .find_map(|(session, slot)| evening_split(model, session, slot))
    {
        return Some(v);
    }
    if let Some(v) = model
        .slot_indices()
        .find_map(|slot| five_hundred_level_in_slot(model, a, slot))
    {
        return Some(v);
    }
    a.placements()
        .find_map(|(session, slot)| reserved_tuesday(model, session, slot))
}

/// Checks the rules that involve the just placed `session`.
///
/// `a` must already contain the placement. Only constraints touching `session`
/// are examined, so a violation elsewhere in `a` is not reported.
pub fn violation_after_placing(
    model: &Model,
    a: &PartialAssignment,
    session: SessionIndex,
) -> Option<HardViolation> {
    debug_assert!(
        a.is_placed(session),
        "called `violation_after_placing` with unplaced session: {}",
        session
    );
    let slot = a.slot_of(session)?;

    capacity(model, a, slot)
        .or_else(|| section_overlap(model, a, session, slot))
        .or_else(|| incompatible(model, a, session, slot, false))
        .or_else(|| fixed(model, session, slot))
        .or_else(|| forbidden(model, session, slot))
        .or_else(|| evening_split(model, session, slot))
        .or_else(|| {
            if is_500_level_lecture(model, session) {
                five_hundred_level_in_slot(model, a, slot)
            } else {
                None
            }
        })
        .or_else(|| reserved_tuesday(model, session, slot))
}
