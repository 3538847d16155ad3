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

//! Partial assignments of sessions to slots.
//!
//! A `PartialAssignment` is the problem state carried by every search node.
//! It stores the mapping in both directions: `slot_of[session]` for the
//! session view and a small occupant list per slot for the slot view, so the
//! checker can answer "where is this session" and "who is in this slot"
//! without scanning. A bit set of placed sessions lets selectors find the
//! next unplaced session with a word scan.
//!
//! Assignments are only ever extended. Children are produced by cloning the
//! parent and placing one more session (`with_placement`), so every node owns
//! an independent copy and no undo trail is needed.

use fixedbitset::FixedBitSet;
use slotwise_model::{
    index::{SessionIndex, SlotIndex},
    model::Model,
};
use smallvec::SmallVec;

/// Occupants of one slot, in placement order.
pub type Occupants = SmallVec<[SessionIndex; 4]>;

/// A mapping of a subset of sessions to slots.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PartialAssignment {
    slot_of: Vec<Option<SlotIndex>>,
    occupants: Vec<Occupants>,
    placed: FixedBitSet,
    num_placed: usize,
}

impl PartialAssignment {
    /// Creates an empty assignment for the given dimensions.
    pub fn new(num_sessions: usize, num_slots: usize) -> Self {
        Self {
            slot_of: vec![None; num_sessions],
            occupants: vec![Occupants::new(); num_slots],
            placed: FixedBitSet::with_capacity(num_sessions),
            num_placed: 0,
        }
    }

    /// Creates an empty assignment sized for `model`.
    #[inline]
    pub fn empty_for(model: &Model) -> Self {
        Self::new(model.num_sessions(), model.num_slots())
    }

    /// Creates a complete assignment where session `i` is placed in `slots[i]`.
    ///
    /// # Panics
    ///
    /// Panics if `slots.len()` differs from the number of sessions in `model`.
    pub fn from_slots(model: &Model, slots: &[SlotIndex]) -> Self {
        assert_eq!(
            slots.len(),
            model.num_sessions(),
            "called `PartialAssignment::from_slots` with {} slots for {} sessions",
            slots.len(),
            model.num_sessions()
        );
        let mut assignment = Self::empty_for(model);
        for (i, &slot) in slots.iter().enumerate() {
            assignment.place(SessionIndex::new(i), slot);
        }
        assignment
    }

    #[inline]
    pub fn num_sessions(&self) -> usize {
        self.slot_of.len()
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.occupants.len()
    }

    /// Number of placed sessions; also the depth of the node holding it.
    #[inline]
    pub fn num_placed(&self) -> usize {
        self.num_placed
    }

    /// Returns `true` if every session is placed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.num_placed == self.slot_of.len()
    }

    /// Returns the slot hosting `session`, if it is placed.
    #[inline]
    pub fn slot_of(&self, session: SessionIndex) -> Option<SlotIndex> {
        debug_assert!(
            session.get() < self.num_sessions(),
            "called `PartialAssignment::slot_of` with session index out of bounds: the len is {} but the index is {}",
            self.num_sessions(),
            session.get()
        );
        self.slot_of[session.get()]
    }

    #[inline]
    pub fn is_placed(&self, session: SessionIndex) -> bool {
        self.placed.contains(session.get())
    }

    /// Sessions currently in `slot`, in placement order.
    #[inline]
    pub fn occupants(&self, slot: SlotIndex) -> &[SessionIndex] {
        debug_assert!(
            slot.get() < self.num_slots(),
            "called `PartialAssignment::occupants` with slot index out of bounds: the len is {} but the index is {}",
            self.num_slots(),
            slot.get()
        );
        &self.occupants[slot.get()]
    }

    #[inline]
    pub fn occupancy(&self, slot: SlotIndex) -> usize {
        self.occupants(slot).len()
    }

    /// The lowest-indexed unplaced session.
    #[inline]
    pub fn first_unplaced(&self) -> Option<SessionIndex> {
        self.placed.zeroes().next().map(SessionIndex::new)
    }

    /// Iterates unplaced sessions in index order.
    #[inline]
    pub fn unplaced(&self) -> impl Iterator<Item = SessionIndex> + '_ {
        self.placed.zeroes().map(SessionIndex::new)
    }

    /// Iterates `(session, slot)` for every placed session in index order.
    pub fn placements(&self) -> impl Iterator<Item = (SessionIndex, SlotIndex)> + '_ {
        self.placed
            .ones()
            .filter_map(move |i| self.slot_of[i].map(|slot| (SessionIndex::new(i), slot)))
    }

    /// Places `session` in `slot`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `session` is already placed.
    pub fn place(&mut self, session: SessionIndex, slot: SlotIndex) {
        debug_assert!(
            !self.is_placed(session),
            "called `PartialAssignment::place` with already placed session: {}",
            session
        );
        self.slot_of[session.get()] = Some(slot);
        self.occupants[slot.get()].push(session);
        self.placed.insert(session.get());
        self.num_placed += 1;
    }

    /// Returns a copy of this assignment extended by one placement.
    #[inline]
    pub fn with_placement(&self, session: SessionIndex, slot: SlotIndex) -> Self {
        let mut child = self.clone();
        child.place(session, slot);
        child
    }

    /// The per-session slot vector, or `None` while any session is unplaced.
    pub fn to_slots(&self) -> Option<Vec<SlotIndex>> {
        self.slot_of.iter().copied().collect()
    }
}

impl std::fmt::Display for PartialAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PartialAssignment({}/{} placed)",
            self.num_placed,
            self.num_sessions()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn si(i: usize) -> SessionIndex {
        SessionIndex::new(i)
    }

    fn sl(i: usize) -> SlotIndex {
        SlotIndex::new(i)
    }

    #[test]
    fn test_empty_assignment() {
        let a = PartialAssignment::new(3, 2);
        assert_eq!(a.num_placed(), 0);
        assert!(!a.is_complete());
        assert_eq!(a.first_unplaced(), Some(si(0)));
        assert_eq!(a.occupancy(sl(1)), 0);
        assert!(a.to_slots().is_none());
    }

    #[test]
    fn test_place_updates_both_views() {
        let mut a = PartialAssignment::new(3, 2);
        a.place(si(1), sl(0));
        a.place(si(2), sl(0));

        assert_eq!(a.slot_of(si(1)), Some(sl(0)));
        assert_eq!(a.slot_of(si(0)), None);
        assert_eq!(a.occupants(sl(0)), &[si(1), si(2)]);
        assert_eq!(a.first_unplaced(), Some(si(0)));
        assert_eq!(a.unplaced().collect::<Vec<_>>(), vec![si(0)]);
        assert_eq!(
            a.placements().collect::<Vec<_>>(),
            vec![(si(1), sl(0)), (si(2), sl(0))]
        );
    }

    #[test]
    fn test_with_placement_leaves_parent_untouched() {
        let parent = PartialAssignment::new(2, 2);
        let child = parent.with_placement(si(0), sl(1));
        let grandchild = child.with_placement(si(1), sl(1));

        assert_eq!(parent.num_placed(), 0);
        assert_eq!(child.num_placed(), 1);
        assert!(grandchild.is_complete());
        assert_eq!(grandchild.first_unplaced(), None);
        assert_eq!(grandchild.to_slots(), Some(vec![sl(1), sl(1)]));
        assert_eq!(parent.occupancy(sl(1)), 0);
    }

    #[test]
    #[should_panic(expected = "already placed session")]
    #[cfg(debug_assertions)]
    fn test_double_placement_panics_in_debug() {
        let mut a = PartialAssignment::new(1, 2);
        a.place(si(0), sl(0));
        a.place(si(0), sl(1));
    }
}
