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

//! Sessions: the lecture and lab/tutorial occurrences that need a slot.

/// The kind of a session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionKind {
    Lecture,
    Lab,
    Tutorial,
}

impl SessionKind {
    #[inline]
    pub const fn is_lab_or_tutorial(&self) -> bool {
        matches!(self, SessionKind::Lab | SessionKind::Tutorial)
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKind::Lecture => write!(f, "LEC"),
            SessionKind::Lab => write!(f, "LAB"),
            SessionKind::Tutorial => write!(f, "TUT"),
        }
    }
}

/// Section numbers from this value upwards are evening sections.
pub const EVENING_SECTION_THRESHOLD: u32 = 90;

/// A lecture, lab or tutorial of one course section.
///
/// Labs and tutorials carry the section number of the lecture they belong to,
/// plus their own `number` for display.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Session {
    faculty: String,
    course_number: String,
    section: u32,
    kind: SessionKind,
    number: Option<u32>,
}

impl Session {
    /// Creates a lecture session, e.g. `CPSC 433 LEC 01`.
    pub fn lecture<F, C>(faculty: F, course_number: C, section: u32) -> Self
    where
        F: Into<String>,
        C: Into<String>,
    {
        Self {
            faculty: faculty.into(),
            course_number: course_number.into(),
            section,
            kind: SessionKind::Lecture,
            number: None,
        }
    }

    /// Creates a lab or tutorial session attached to lecture `section`.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is `SessionKind::Lecture`.
    pub fn lab<F, C>(
        faculty: F,
        course_number: C,
        section: u32,
        kind: SessionKind,
        number: u32,
    ) -> Self
    where
        F: Into<String>,
        C: Into<String>,
    {
        assert!(
            kind.is_lab_or_tutorial(),
            "called `Session::lab` with kind {kind}: use `Session::lecture` for lectures"
        );
        Self {
            faculty: faculty.into(),
            course_number: course_number.into(),
            section,
            kind,
            number: Some(number),
        }
    }

    #[inline]
    pub fn faculty(&self) -> &str {
        &self.faculty
    }

    #[inline]
    pub fn course_number(&self) -> &str {
        &self.course_number
    }

    #[inline]
    pub fn section(&self) -> u32 {
        self.section
    }

    #[inline]
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    #[inline]
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    #[inline]
    pub fn is_lecture(&self) -> bool {
        self.kind == SessionKind::Lecture
    }

    #[inline]
    pub fn is_lab_or_tutorial(&self) -> bool {
        self.kind.is_lab_or_tutorial()
    }

    /// Courses numbered 5xx.
    #[inline]
    pub fn is_500_level(&self) -> bool {
        self.course_number.starts_with('5')
    }

    #[inline]
    pub fn is_evening_section(&self) -> bool {
        self.section >= EVENING_SECTION_THRESHOLD
    }

    /// Same faculty and course number.
    #[inline]
    pub fn same_course(&self, other: &Session) -> bool {
        self.faculty == other.faculty && self.course_number == other.course_number
    }

    /// Same faculty, course number and section.
    #[inline]
    pub fn same_section(&self, other: &Session) -> bool {
        self.same_course(other) && self.section == other.section
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.kind, self.number) {
            (SessionKind::Lecture, _) | (_, None) => write!(
                f,
                "{} {} LEC {:02}",
                self.faculty, self.course_number, self.section
            ),
            (kind, Some(number)) => write!(
                f,
                "{} {} LEC {:02} {} {:02}",
                self.faculty, self.course_number, self.section, kind, number
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let lec = Session::lecture("CPSC", "433", 1);
        let tut = Session::lab("CPSC", "433", 1, SessionKind::Tutorial, 2);
        assert_eq!(format!("{}", lec), "CPSC 433 LEC 01");
        assert_eq!(format!("{}", tut), "CPSC 433 LEC 01 TUT 02");
    }

    #[test]
    fn test_relations() {
        let a = Session::lecture("CPSC", "433", 1);
        let b = Session::lecture("CPSC", "433", 2);
        let lab = Session::lab("CPSC", "433", 1, SessionKind::Lab, 1);
        let other = Session::lecture("SENG", "433", 1);

        assert!(a.same_course(&b));
        assert!(!a.same_section(&b));
        assert!(a.same_section(&lab));
        assert!(!a.same_course(&other));
    }

    #[test]
    fn test_level_and_evening_flags() {
        assert!(Session::lecture("CPSC", "567", 1).is_500_level());
        assert!(!Session::lecture("CPSC", "457", 1).is_500_level());
        assert!(Session::lecture("CPSC", "457", 90).is_evening_section());
        assert!(!Session::lecture("CPSC", "457", 89).is_evening_section());
    }

    #[test]
    #[should_panic(expected = "use `Session::lecture` for lectures")]
    fn test_lab_constructor_rejects_lecture_kind() {
        let _ = Session::lab("CPSC", "433", 1, SessionKind::Lecture, 1);
    }
}
