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

//! Slots: weekly time windows with an occupancy range.
//!
//! A slot is either a lecture slot or a lab slot. Which sessions are in a slot
//! is not part of the slot; occupancy belongs to an assignment.

use crate::{
    session::Session,
    time::{ClockTime, TimeWindow, Weekday},
};

/// A schedulable window with occupancy bounds `min..=max`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    window: TimeWindow,
    min: u32,
    max: u32,
    is_lab: bool,
}

impl Slot {
    /// Creates a lecture slot.
    #[inline]
    pub const fn lecture(window: TimeWindow, min: u32, max: u32) -> Self {
        Self {
            window,
            min,
            max,
            is_lab: false,
        }
    }

    /// Creates a lab/tutorial slot.
    #[inline]
    pub const fn lab(window: TimeWindow, min: u32, max: u32) -> Self {
        Self {
            window,
            min,
            max,
            is_lab: true,
        }
    }

    #[inline]
    pub const fn window(&self) -> &TimeWindow {
        &self.window
    }

    #[inline]
    pub const fn start(&self) -> ClockTime {
        self.window.start()
    }

    #[inline]
    pub const fn min(&self) -> u32 {
        self.min
    }

    #[inline]
    pub const fn max(&self) -> u32 {
        self.max
    }

    #[inline]
    pub const fn is_lab(&self) -> bool {
        self.is_lab
    }

    /// Returns `true` if the two slots meet at a common time on a common day.
    /// Every non-empty slot conflicts with itself.
    #[inline]
    pub const fn conflicts(&self, other: &Slot) -> bool {
        self.window.overlaps(&other.window)
    }

    /// Returns `true` if `session` is of the kind this slot hosts:
    /// lectures go to lecture slots, labs and tutorials to lab slots.
    #[inline]
    pub fn accepts_kind_of(&self, session: &Session) -> bool {
        self.is_lab == session.is_lab_or_tutorial()
    }

    /// Lecture slots meeting on Tuesday at 11:00 are reserved.
    #[inline]
    pub fn is_reserved_tuesday_lecture_slot(&self) -> bool {
        const ELEVEN: u16 = 11 * 60;
        !self.is_lab
            && self.window.days().contains(Weekday::Tuesday)
            && self.window.start().minutes() == ELEVEN
    }

    #[inline]
    pub fn starts_in_evening(&self) -> bool {
        self.window.start() >= ClockTime::EVENING
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} [{}..={}]",
            if self.is_lab { "LAB" } else { "LEC" },
            self.window,
            self.min,
            self.max
        )
    }
}
