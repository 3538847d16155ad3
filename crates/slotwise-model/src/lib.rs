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

//! # Slotwise Model
//!
//! **The static domain model of the Slotwise timetabling engine.**
//!
//! This crate holds everything the search reads but never mutates: the
//! sessions to be placed, the slots that can hold them, the per-session
//! constraint records, and the scoring configuration. It is the interchange
//! layer between an external loader and the solving engine (`slotwise_bnb`).
//!
//! ## Architecture
//!
//! * **`index`**: strongly typed `SessionIndex` / `SlotIndex` wrappers.
//! * **`time`**: weekdays, clock times and the half-open time windows slots occupy.
//! * **`session`** / **`slot`**: the two kinds of entities being matched.
//! * **`constraint`**: per-session fixed, preferred, paired, forbidden and incompatible relations.
//! * **`config`**: integer penalties and floating weights, validated by a builder.
//! * **`model`**: the immutable `Model` and the validating `ModelBuilder`.
//! * **`solution`**: the reported assignment together with its score breakdown.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: session and slot indices are distinct types.
//! 2.  **Precomputation**: slot conflicts, lecture/lab siblings, reverse pairings and
//!     candidate slots are derived once at build time so the checker stays cheap.
//! 3.  **Fail-Fast**: the builder rejects dangling references and inconsistent data,
//!     the engine assumes referential integrity afterwards.

pub mod config;
pub mod constraint;
pub mod index;
pub mod model;
pub mod session;
pub mod slot;
pub mod solution;
pub mod time;
