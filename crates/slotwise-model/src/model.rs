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

//! # Model and Model Builder
//!
//! `ModelBuilder` collects sessions, slots and constraint statements in any
//! order and checks them all at once in `build`. The resulting `Model` is
//! immutable and carries the relations the checker needs in precomputed form:
//!
//! * `conflicting_slots(s)`: every slot whose window overlaps `s`, including `s`.
//! * `section_siblings(x)`: for a lecture, the labs/tutorials of its section;
//!   for a lab/tutorial, the lectures of its section.
//! * `pair_watchers(x)`: every session that lists `x` as a pairing partner.
//! * `candidate_slots(x)`: the slots of the kind `x` needs, in slot order.
//!
//! Relations given as pairs (`add_pair`, `add_incompatible`) are symmetric and
//! stored on both sessions. Repeated statements are recorded once.

use crate::{
    constraint::{ConstraintRecord, Preference},
    index::{SessionIndex, SlotIndex},
    session::Session,
    slot::Slot,
};
use fixedbitset::FixedBitSet;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Inline capacity for per-slot conflict lists.
pub type SlotList = SmallVec<[SlotIndex; 8]>;

/// Inline capacity for per-session sibling lists.
pub type SessionList = SmallVec<[SessionIndex; 4]>;

/// The immutable timetabling instance.
#[derive(Clone)]
pub struct Model {
    sessions: Vec<Session>,
    slots: Vec<Slot>,
    records: Vec<ConstraintRecord>,
    slot_conflicts: Vec<SlotList>,
    // Row-major `num_slots x num_slots` conflict matrix.
    conflict_matrix: FixedBitSet,
    section_siblings: Vec<SessionList>,
    pair_watchers: Vec<SessionList>,
    candidate_slots: Vec<Vec<SlotIndex>>,
}

impl Model {
    #[inline]
    pub fn num_sessions(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Returns the session at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn session(&self, index: SessionIndex) -> &Session {
        debug_assert!(
            index.get() < self.num_sessions(),
            "called `Model::session` with session index out of bounds: the len is {} but the index is {}",
            self.num_sessions(),
            index.get()
        );
        &self.sessions[index.get()]
    }

    /// Returns the slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn slot(&self, index: SlotIndex) -> &Slot {
        debug_assert!(
            index.get() < self.num_slots(),
            "called `Model::slot` with slot index out of bounds: the len is {} but the index is {}",
            self.num_slots(),
            index.get()
        );
        &self.slots[index.get()]
    }

    /// Returns the constraint record of the session at `index`.
    #[inline]
    pub fn record(&self, index: SessionIndex) -> &ConstraintRecord {
        &self.records[index.get()]
    }

    /// Returns `true` if the windows of `a` and `b` overlap.
    #[inline]
    pub fn slots_conflict(&self, a: SlotIndex, b: SlotIndex) -> bool {
        self.conflict_matrix
            .contains(a.get() * self.num_slots() + b.get())
    }

    /// All slots overlapping `slot`, including `slot` itself, in slot order.
    #[inline]
    pub fn conflicting_slots(&self, slot: SlotIndex) -> &[SlotIndex] {
        &self.slot_conflicts[slot.get()]
    }

    /// Sessions of the same faculty, course and section but the opposite kind.
    #[inline]
    pub fn section_siblings(&self, session: SessionIndex) -> &[SessionIndex] {
        &self.section_siblings[session.get()]
    }

    /// Sessions that list `session` as a pairing partner.
    #[inline]
    pub fn pair_watchers(&self, session: SessionIndex) -> &[SessionIndex] {
        &self.pair_watchers[session.get()]
    }

    /// Slots able to host `session`, in slot order.
    #[inline]
    pub fn candidate_slots(&self, session: SessionIndex) -> &[SlotIndex] {
        &self.candidate_slots[session.get()]
    }

    /// Iterates all session indices in input order.
    #[inline]
    pub fn session_indices(&self) -> impl ExactSizeIterator<Item = SessionIndex> + use<> {
        (0..self.num_sessions()).map(SessionIndex::new)
    }

    /// Iterates all slot indices in input order.
    #[inline]
    pub fn slot_indices(&self) -> impl ExactSizeIterator<Item = SlotIndex> + use<> {
        (0..self.num_slots()).map(SlotIndex::new)
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("num_sessions", &self.num_sessions())
            .field("num_slots", &self.num_slots())
            .finish()
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Model(sessions: {}, slots: {})",
            self.num_sessions(),
            self.num_slots()
        )
    }
}

/// The error type for rejected model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A statement references a session that was never added.
    UnknownSession(SessionIndex),
    /// A statement references a slot that was never added.
    UnknownSlot(SlotIndex),
    /// A slot has `min > max`.
    InvalidCapacity { slot: SlotIndex, min: u32, max: u32 },
    /// A slot has no days or a non-positive length.
    EmptyWindow(SlotIndex),
    /// A preference carries a negative penalty.
    NegativePreferencePenalty { session: SessionIndex, penalty: i64 },
    /// A session was declared incompatible with itself.
    SelfIncompatible(SessionIndex),
    /// A session was paired with itself.
    SelfPair(SessionIndex),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSession(s) => write!(f, "Reference to unknown session {}", s),
            Self::UnknownSlot(s) => write!(f, "Reference to unknown slot {}", s),
            Self::InvalidCapacity { slot, min, max } => {
                write!(f, "Slot {} has min {} greater than max {}", slot, min, max)
            }
            Self::EmptyWindow(s) => write!(f, "Slot {} has an empty time window", s),
            Self::NegativePreferencePenalty { session, penalty } => write!(
                f,
                "Session {} has negative preference penalty {}",
                session, penalty
            ),
            Self::SelfIncompatible(s) => write!(f, "Session {} is incompatible with itself", s),
            Self::SelfPair(s) => write!(f, "Session {} is paired with itself", s),
        }
    }
}

impl std::error::Error for ModelError {}

/// A mutable collector of sessions, slots and constraint statements.
#[derive(Clone, Default)]
pub struct ModelBuilder {
    sessions: Vec<Session>,
    slots: Vec<Slot>,
    fixed: Vec<(SessionIndex, SlotIndex)>,
    preferences: Vec<(SessionIndex, Preference)>,
    pairs: Vec<(SessionIndex, SessionIndex)>,
    forbidden: Vec<(SessionIndex, SlotIndex)>,
    incompatible: Vec<(SessionIndex, SessionIndex)>,
}

impl ModelBuilder {
    /// Creates an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn num_sessions(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Adds a session and returns its index. Sessions are indexed in insertion order,
    /// which is also the default branching order of the search.
    pub fn add_session(&mut self, session: Session) -> SessionIndex {
        self.sessions.push(session);
        SessionIndex::new(self.sessions.len() - 1)
    }

    /// Adds a slot and returns its index.
    pub fn add_slot(&mut self, slot: Slot) -> SlotIndex {
        self.slots.push(slot);
        SlotIndex::new(self.slots.len() - 1)
    }

    /// Requires `session` to be placed in `slot`.
    pub fn set_fixed(&mut self, session: SessionIndex, slot: SlotIndex) -> &mut Self {
        self.fixed.push((session, slot));
        self
    }

    /// Prefers `slot` for `session`; placing it elsewhere costs `penalty`.
    /// If several preferences are given for one session, the last one wins.
    pub fn set_preference(
        &mut self,
        session: SessionIndex,
        slot: SlotIndex,
        penalty: i64,
    ) -> &mut Self {
        self.preferences
            .push((session, Preference { slot, penalty }));
        self
    }

    /// Asks for `a` and `b` to be placed together.
    pub fn add_pair(&mut self, a: SessionIndex, b: SessionIndex) -> &mut Self {
        self.pairs.push((a, b));
        self
    }

    /// Forbids placing `session` in `slot`.
    pub fn add_forbidden(&mut self, session: SessionIndex, slot: SlotIndex) -> &mut Self {
        self.forbidden.push((session, slot));
        self
    }

    /// Forbids `a` and `b` from occupying overlapping slots.
    pub fn add_incompatible(&mut self, a: SessionIndex, b: SessionIndex) -> &mut Self {
        self.incompatible.push((a, b));
        self
    }

    fn check_session(&self, session: SessionIndex) -> Result<(), ModelError> {
        if session.get() < self.sessions.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownSession(session))
        }
    }

    fn check_slot(&self, slot: SlotIndex) -> Result<(), ModelError> {
        if slot.get() < self.slots.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownSlot(slot))
        }
    }

    /// Validates all statements and builds the immutable model.
    pub fn build(self) -> Result<Model, ModelError> {
        let num_sessions = self.sessions.len();
        let num_slots = self.slots.len();

        for (i, slot) in self.slots.iter().enumerate() {
            let index = SlotIndex::new(i);
            if slot.window().is_empty() {
                return Err(ModelError::EmptyWindow(index));
            }
            if slot.min() > slot.max() {
                return Err(ModelError::InvalidCapacity {
                    slot: index,
                    min: slot.min(),
                    max: slot.max(),
                });
            }
        }

        let mut records: Vec<ConstraintRecord> = (0..num_sessions)
            .map(|_| ConstraintRecord::empty(num_sessions, num_slots))
            .collect();

        for &(session, slot) in &self.forbidden {
            self.check_session(session)?;
            self.check_slot(slot)?;
            records[session.get()].forbid(slot);
        }

        // Contradictory fixings (two slots, a forbidden slot, a slot of the
        // wrong kind) are kept; the hard rules make such instances infeasible.
        for &(session, slot) in &self.fixed {
            self.check_session(session)?;
            self.check_slot(slot)?;
            records[session.get()].add_fixed(slot);
        }

        for &(session, preference) in &self.preferences {
            self.check_session(session)?;
            self.check_slot(preference.slot)?;
            if preference.penalty < 0 {
                return Err(ModelError::NegativePreferencePenalty {
                    session,
                    penalty: preference.penalty,
                });
            }
            records[session.get()].set_preference(preference);
        }

        for &(a, b) in &self.incompatible {
            self.check_session(a)?;
            self.check_session(b)?;
            if a == b {
                return Err(ModelError::SelfIncompatible(a));
            }
            records[a.get()].mark_incompatible(b);
            records[b.get()].mark_incompatible(a);
        }

        let mut pair_watchers: Vec<SessionList> = vec![SessionList::new(); num_sessions];
        let mut seen_pairs: FxHashSet<(SessionIndex, SessionIndex)> = FxHashSet::default();
        for &(a, b) in &self.pairs {
            self.check_session(a)?;
            self.check_session(b)?;
            if a == b {
                return Err(ModelError::SelfPair(a));
            }
            for (from, to) in [(a, b), (b, a)] {
                if seen_pairs.insert((from, to)) {
                    records[from.get()].push_pair(to);
                    pair_watchers[to.get()].push(from);
                }
            }
        }

        let mut conflict_matrix = FixedBitSet::with_capacity(num_slots * num_slots);
        let mut slot_conflicts: Vec<SlotList> = Vec::with_capacity(num_slots);
        for (i, a) in self.slots.iter().enumerate() {
            let mut list = SlotList::new();
            for (j, b) in self.slots.iter().enumerate() {
                if a.conflicts(b) {
                    conflict_matrix.insert(i * num_slots + j);
                    list.push(SlotIndex::new(j));
                }
            }
            slot_conflicts.push(list);
        }

        // Group by (faculty, course, section) to link lectures with their labs.
        let mut by_section: FxHashMap<(&str, &str, u32), SessionList> = FxHashMap::default();
        for (i, session) in self.sessions.iter().enumerate() {
            by_section
                .entry((session.faculty(), session.course_number(), session.section()))
                .or_default()
                .push(SessionIndex::new(i));
        }
        let mut section_siblings: Vec<SessionList> = vec![SessionList::new(); num_sessions];
        for members in by_section.values() {
            for &x in members {
                let kind_is_lab = self.sessions[x.get()].is_lab_or_tutorial();
                section_siblings[x.get()] = members
                    .iter()
                    .copied()
                    .filter(|y| self.sessions[y.get()].is_lab_or_tutorial() != kind_is_lab)
                    .collect();
            }
        }

        let candidate_slots: Vec<Vec<SlotIndex>> = self
            .sessions
            .iter()
            .map(|session| {
                self.slots
                    .iter()
                    .enumerate()
                    .filter(|(_, slot)| slot.accepts_kind_of(session))
                    .map(|(j, _)| SlotIndex::new(j))
                    .collect()
            })
            .collect();

        Ok(Model {
            sessions: self.sessions,
            slots: self.slots,
            records,
            slot_conflicts,
            conflict_matrix,
            section_siblings,
            pair_watchers,
            candidate_slots,
        })
    }
}

impl std::fmt::Debug for ModelBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBuilder")
            .field("num_sessions", &self.num_sessions())
            .field("num_slots", &self.num_slots())
            .finish()
    }
}
