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

//! # Weekly Time Primitives
//!
//! Slots repeat every week: a slot is a set of weekdays plus a half-open clock
//! window `[start, end)` that applies to each of those days. Clock times are
//! stored as minutes since midnight, which keeps overlap tests to a couple of
//! integer comparisons.
//!
//! Two windows *overlap* when they share at least one weekday and their clock
//! ranges intersect. Overlap is reflexive for every non-empty window, which the
//! checker relies on: a slot always conflicts with itself.

/// A day of the week.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in calendar order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    #[inline(always)]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Two letter abbreviation, e.g. `TU`.
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Weekday::Monday => "MO",
            Weekday::Tuesday => "TU",
            Weekday::Wednesday => "WE",
            Weekday::Thursday => "TH",
            Weekday::Friday => "FR",
            Weekday::Saturday => "SA",
            Weekday::Sunday => "SU",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// A set of weekdays packed into a single byte.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DaySet(u8);

impl DaySet {
    /// The empty set.
    pub const EMPTY: DaySet = DaySet(0);

    /// Monday, Wednesday and Friday.
    pub const MWF: DaySet = DaySet(
        Weekday::Monday.bit() | Weekday::Wednesday.bit() | Weekday::Friday.bit(),
    );

    /// Tuesday and Thursday.
    pub const TR: DaySet = DaySet(Weekday::Tuesday.bit() | Weekday::Thursday.bit());

    /// Creates a set containing only `day`.
    #[inline]
    pub const fn single(day: Weekday) -> Self {
        DaySet(day.bit())
    }

    /// Returns a copy of this set with `day` added.
    #[inline]
    pub const fn with(self, day: Weekday) -> Self {
        DaySet(self.0 | day.bit())
    }

    #[inline]
    pub const fn contains(&self, day: Weekday) -> bool {
        self.0 & day.bit() != 0
    }

    #[inline]
    pub const fn intersects(&self, other: &DaySet) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates the contained days in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        Weekday::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(DaySet::EMPTY, DaySet::with)
    }
}

impl std::fmt::Debug for DaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl std::fmt::Display for DaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for day in self.iter() {
            write!(f, "{}", day)?;
        }
        Ok(())
    }
}

/// A time of day with minute resolution.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockTime(u16);

impl ClockTime {
    /// Minutes in a day; also the latest representable end of a window.
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    /// Start of the evening block. Sections numbered 90 and above are taught from here on.
    pub const EVENING: ClockTime = ClockTime(18 * 60);

    /// Creates a clock time, returning `None` for `hour >= 24` or `minute >= 60`.
    #[inline]
    pub const fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(ClockTime(hour * 60 + minute))
    }

    /// Creates a clock time from minutes since midnight.
    /// Accepts `MINUTES_PER_DAY` itself so that a window can end at midnight.
    #[inline]
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes > Self::MINUTES_PER_DAY {
            return None;
        }
        Some(ClockTime(minutes))
    }

    #[inline]
    pub const fn minutes(&self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn hour(&self) -> u16 {
        self.0 / 60
    }

    #[inline]
    pub const fn minute(&self) -> u16 {
        self.0 % 60
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:02}", self.hour(), self.minute())
    }
}

/// A weekly recurring window `[start, end)` on every day in `days`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    days: DaySet,
    start: ClockTime,
    end: ClockTime,
}

impl TimeWindow {
    #[inline]
    pub const fn new(days: DaySet, start: ClockTime, end: ClockTime) -> Self {
        Self { days, start, end }
    }

    #[inline]
    pub const fn days(&self) -> DaySet {
        self.days
    }

    #[inline]
    pub const fn start(&self) -> ClockTime {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> ClockTime {
        self.end
    }

    /// A window is empty when it has no days or a non-positive length.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.days.is_empty() || self.end.0 <= self.start.0
    }

    /// Returns `true` if both windows meet on a common day at a common time.
    #[inline]
    pub const fn overlaps(&self, other: &TimeWindow) -> bool {
        self.days.intersects(&other.days) && self.start.0 < other.end.0 && other.start.0 < self.end.0
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}-{}", self.days, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u16, m: u16) -> ClockTime {
        ClockTime::new(h, m).unwrap()
    }

    #[test]
    fn test_clock_time_bounds() {
        assert!(ClockTime::new(24, 0).is_none());
        assert!(ClockTime::new(23, 60).is_none());
        assert_eq!(t(18, 0), ClockTime::EVENING);
        assert_eq!(format!("{}", t(8, 5)), "8:05");
        assert_eq!(ClockTime::from_minutes(1440).map(|c| c.hour()), Some(24));
        assert!(ClockTime::from_minutes(1441).is_none());
    }

    #[test]
    fn test_day_set_membership_and_display() {
        assert!(DaySet::MWF.contains(Weekday::Wednesday));
        assert!(!DaySet::MWF.contains(Weekday::Tuesday));
        assert!(!DaySet::MWF.intersects(&DaySet::TR));
        let custom: DaySet = [Weekday::Friday, Weekday::Monday].into_iter().collect();
        assert_eq!(format!("{}", custom), "MOFR");
        assert!(custom.intersects(&DaySet::MWF));
    }

    #[test]
    fn test_overlap_is_reflexive_and_symmetric() {
        let a = TimeWindow::new(DaySet::MWF, t(8, 0), t(9, 0));
        let b = TimeWindow::new(DaySet::single(Weekday::Friday), t(8, 30), t(10, 0));
        assert!(a.overlaps(&a));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_windows_do_not_overlap() {
        let a = TimeWindow::new(DaySet::TR, t(9, 30), t(11, 0));
        let b = TimeWindow::new(DaySet::TR, t(11, 0), t(12, 30));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_disjoint_days_do_not_overlap() {
        let a = TimeWindow::new(DaySet::MWF, t(8, 0), t(9, 0));
        let b = TimeWindow::new(DaySet::TR, t(8, 0), t(9, 0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_empty_window() {
        assert!(TimeWindow::new(DaySet::EMPTY, t(8, 0), t(9, 0)).is_empty());
        assert!(TimeWindow::new(DaySet::MWF, t(9, 0), t(9, 0)).is_empty());
        assert!(!TimeWindow::new(DaySet::MWF, t(8, 0), t(9, 0)).is_empty());
    }
}
