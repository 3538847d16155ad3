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

//! Slotwise‑BnB: branch‑and‑bound for course and lab timetabling
//!
//! Assigns every session of a `slotwise_model::model::Model` to a slot so
//! that all hard constraints hold and the weighted soft penalty is minimal.
//! The engine separates the frontier, session selection, evaluation,
//! monitoring and incumbent handling so strategies can be swapped without
//! touching the search loop.
//!
//! Core flow
//! - Build a `Model` with `ModelBuilder` and a `ScoringConfig`.
//! - Choose a `frontier::Frontier` (depth‑first or best‑first).
//! - Choose a `branching::SessionSelector`.
//! - Optionally add monitors and a shared incumbent.
//! - Run `bnb::BnbSolver`.
//!
//! Assumptions and guarantees
//! - The bound score never decreases when a session is placed and never
//!   exceeds the final score of any completion; pruning relies on this.
//! - Runs are deterministic for a given model, configuration, frontier and
//!   selector, with or without the `parallel` feature.
//!
//! Module map
//! - `assignment`: partial session → slot mappings.
//! - `bnb`: the solver engine and session orchestration.
//! - `branching`: session selectors.
//! - `eval`: hard and soft constraint checking, bounds and validation.
//! - `frontier`: open leaf containers.
//! - `incumbent`: local and thread‑safe shared incumbents.
//! - `monitor`: tree‑search monitors (log, limits, composite).
//! - `node`: search nodes with cached evaluations.
//! - `result`: solver outcomes with termination reasons.
//! - `stats`: lightweight counters/timing.

pub mod assignment;
pub mod bnb;
pub mod branching;
pub mod eval;
pub mod frontier;
pub mod incumbent;
pub mod monitor;
pub mod node;
pub mod result;
pub mod stats;

#[cfg(test)]
mod fixtures;
