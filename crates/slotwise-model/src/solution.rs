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

use crate::index::{SessionIndex, SlotIndex};

/// The weighted soft-constraint categories making up a score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreBreakdown {
    pub under_fill: i64,
    pub preference: i64,
    pub pairing: i64,
    pub section_difference: i64,
}

impl ScoreBreakdown {
    /// Sum of all categories, saturating at `i64::MAX`.
    #[inline]
    pub fn total(&self) -> i64 {
        self.under_fill
            .saturating_add(self.preference)
            .saturating_add(self.pairing)
            .saturating_add(self.section_difference)
    }
}

impl std::fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "under-fill: {}, preference: {}, pairing: {}, section difference: {}",
            self.under_fill, self.preference, self.pairing, self.section_difference
        )
    }
}

/// A complete timetable.
///
/// `slots[i]` is the slot hosting session `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    score: i64,
    breakdown: ScoreBreakdown,
    slots: Vec<SlotIndex>,
}

impl Solution {
    /// Constructs a new `Solution`; the score is the total of `breakdown`.
    pub fn new(slots: Vec<SlotIndex>, breakdown: ScoreBreakdown) -> Self {
        Self {
            score: breakdown.total(),
            breakdown,
            slots,
        }
    }

    /// Returns the slot assigned to a session.
    ///
    /// # Panics
    ///
    /// Panics if `session` is out of bounds.
    #[inline]
    pub fn slot_for_session(&self, session: SessionIndex) -> SlotIndex {
        debug_assert!(
            session.get() < self.num_sessions(),
            "called `Solution::slot_for_session` with session index out of bounds: the len is {} but the index is {}",
            self.num_sessions(),
            session.get()
        );
        self.slots[session.get()]
    }

    #[inline]
    pub fn num_sessions(&self) -> usize {
        self.slots.len()
    }

    /// The weighted total of all soft-constraint penalties.
    #[inline]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[inline]
    pub fn breakdown(&self) -> &ScoreBreakdown {
        &self.breakdown
    }

    #[inline]
    pub fn slots(&self) -> &[SlotIndex] {
        &self.slots
    }

    /// Iterates the sessions placed in `slot`, in session order.
    pub fn sessions_in(&self, slot: SlotIndex) -> impl Iterator<Item = SessionIndex> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(move |(_, s)| **s == slot)
            .map(|(i, _)| SessionIndex::new(i))
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution Summary")?;
        writeln!(f, "   Score: {}", self.score)?;
        writeln!(f, "   ({})", self.breakdown)?;
        writeln!(f)?;

        if self.slots.is_empty() {
            writeln!(f, "   (No sessions assigned)")?;
            return Ok(());
        }

        writeln!(f, "   {:<10} | {:<10}", "Session", "Slot")?;
        writeln!(f, "   {:-<10}-+-{:-<10}", "", "")?;
        for (i, slot) in self.slots.iter().enumerate() {
            writeln!(f, "   {:<10} | {:<10}", i, slot.get())?;
        }
        Ok(())
    }
}
