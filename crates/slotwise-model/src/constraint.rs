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

//! Per-session constraint records.
//!
//! A record collects everything the input says about one session: where it
//! must go, where it would like to go, where it must not go, who it should be
//! placed alongside and who it must be kept apart from. Records are produced by
//! `ModelBuilder::build` with bit sets sized to the final model, so membership
//! tests in the checker are a single bit lookup.

use crate::index::{SessionIndex, SlotIndex};
use fixedbitset::FixedBitSet;
use smallvec::SmallVec;

/// A soft wish to place a session in `slot`, costing `penalty` when ignored.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Preference {
    pub slot: SlotIndex,
    pub penalty: i64,
}

/// The constraints attached to one session.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ConstraintRecord {
    fixed: SmallVec<[SlotIndex; 1]>,
    preference: Option<Preference>,
    pairs: Vec<SessionIndex>,
    forbidden: FixedBitSet,
    incompatible: FixedBitSet,
}

impl ConstraintRecord {
    /// Creates an empty record for a model of the given dimensions.
    pub fn empty(num_sessions: usize, num_slots: usize) -> Self {
        Self {
            fixed: SmallVec::new(),
            preference: None,
            pairs: Vec::new(),
            forbidden: FixedBitSet::with_capacity(num_slots),
            incompatible: FixedBitSet::with_capacity(num_sessions),
        }
    }

    pub(crate) fn add_fixed(&mut self, slot: SlotIndex) {
        if !self.fixed.contains(&slot) {
            self.fixed.push(slot);
        }
    }

    pub(crate) fn set_preference(&mut self, preference: Preference) {
        self.preference = Some(preference);
    }

    pub(crate) fn push_pair(&mut self, partner: SessionIndex) {
        self.pairs.push(partner);
    }

    pub(crate) fn forbid(&mut self, slot: SlotIndex) {
        self.forbidden.insert(slot.get());
    }

    pub(crate) fn mark_incompatible(&mut self, other: SessionIndex) {
        self.incompatible.insert(other.get());
    }

    /// The first slot this session must be placed in, if any.
    #[inline]
    pub fn fixed(&self) -> Option<SlotIndex> {
        self.fixed.first().copied()
    }

    /// Every slot this session was fixed to, in input order without repeats.
    /// More than one entry makes the session unplaceable.
    #[inline]
    pub fn fixed_slots(&self) -> &[SlotIndex] {
        &self.fixed
    }

    /// The preferred slot and its violation penalty, if any.
    #[inline]
    pub fn preference(&self) -> Option<Preference> {
        self.preference
    }

    /// Sessions this session should be paired with, in input order.
    #[inline]
    pub fn pairs(&self) -> &[SessionIndex] {
        &self.pairs
    }

    #[inline]
    pub fn is_forbidden(&self, slot: SlotIndex) -> bool {
        self.forbidden.contains(slot.get())
    }

    #[inline]
    pub fn is_incompatible_with(&self, other: SessionIndex) -> bool {
        self.incompatible.contains(other.get())
    }

    /// Iterates the slots this session must avoid.
    pub fn forbidden_slots(&self) -> impl Iterator<Item = SlotIndex> + '_ {
        self.forbidden.ones().map(SlotIndex::new)
    }

    /// Iterates the sessions this session must not meet.
    pub fn incompatible_sessions(&self) -> impl Iterator<Item = SessionIndex> + '_ {
        self.incompatible.ones().map(SessionIndex::new)
    }

    /// Returns `true` if the record carries no constraint at all.
    pub fn is_unconstrained(&self) -> bool {
        self.fixed.is_empty()
            && self.preference.is_none()
            && self.pairs.is_empty()
            && self.forbidden.is_clear()
            && self.incompatible.is_clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_is_unconstrained() {
        let record = ConstraintRecord::empty(4, 3);
        assert!(record.is_unconstrained());
        assert!(record.fixed().is_none());
        assert!(!record.is_forbidden(SlotIndex::new(2)));
    }

    #[test]
    fn test_membership_queries() {
        let mut record = ConstraintRecord::empty(4, 3);
        record.forbid(SlotIndex::new(1));
        record.mark_incompatible(SessionIndex::new(3));
        record.push_pair(SessionIndex::new(2));
        record.set_preference(Preference {
            slot: SlotIndex::new(0),
            penalty: 7,
        });

        assert!(record.is_forbidden(SlotIndex::new(1)));
        assert!(!record.is_forbidden(SlotIndex::new(0)));
        assert!(record.is_incompatible_with(SessionIndex::new(3)));
        assert_eq!(record.pairs(), &[SessionIndex::new(2)]);
        assert_eq!(record.preference().map(|p| p.penalty), Some(7));
        assert_eq!(
            record.forbidden_slots().collect::<Vec<_>>(),
            vec![SlotIndex::new(1)]
        );
        assert!(!record.is_unconstrained());
    }
}
