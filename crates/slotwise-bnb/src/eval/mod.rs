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

//! Constraint evaluation for timetabling search
//!
//! Decides feasibility of partial assignments and prices them for the
//! branch‑and‑bound solver.
//!
//! Soundness requirement:
//! - The bound (`fbound`) must be non‑decreasing under extension and must not
//!   exceed the full score (`eval_star`) of any completion. The solver prunes
//!   on it and asserts the property in debug builds via
//!   `validation::is_monotone_bound_exhaustive`.
//!
//! Submodules:
//! - `checker`: `ConstraintChecker` and the per‑node `Evaluation`.
//! - `hard`: the eight hard rules and `HardViolation`.
//! - `soft`: raw soft tallies, the bound tally and weighting.
//! - `validation`: bound soundness checks for development and tests.

pub mod checker;
pub mod hard;
pub mod soft;
pub mod validation;
