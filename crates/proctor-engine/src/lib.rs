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

//! # Proctor Engine
//!
//! **The Seat Distribution Engine for the Proctor Exam Seat Allocation System.**
//!
//! Consumes the canonical records of `proctor_model` read-only and produces
//! per-day, per-hall seat assignments that spread students of the same subject
//! across non-adjacent benches.
//!
//! ## Architecture
//!
//! * **`queue`**: Per-subject student queues with independent shuffles and the
//!   round-robin sweep primitive.
//! * **`distribute`**: The two-phase distribution engine — a primary
//!   interleaved fill followed by a leftover backfill — with a configurable
//!   capacity-overflow policy.
//! * **`schedule`**: Day plans, the alternate (odd-bench) layout mode, and the
//!   per-day orchestration that turns a roster and hall list into a complete
//!   allocation result.
//! * **`project`**: Dense per-bench output records with resolved row/column
//!   coordinates, ready for tabular export.
//! * **`stats`**: Placement statistics surfaced alongside every result.
//!
//! ## Design Philosophy
//!
//! 1. **Injected randomness**: Every randomized entry point takes `&mut R`
//!    where `R: Rng`. Tests pass a seeded generator and get reproducible
//!    output; production callers pass `rand::rng()`.
//! 2. **Atomic allocation**: A fatal condition on any day aborts the whole
//!    request. There are no partial manifests.
//! 3. **Report, don't hide**: Corrections and drops that older systems applied
//!    silently are counted in [`stats::DistributionStats`].

pub mod distribute;
pub mod project;
pub mod queue;
pub mod schedule;
pub mod stats;
