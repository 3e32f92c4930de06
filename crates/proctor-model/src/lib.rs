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

//! # Proctor Model
//!
//! **The Core Domain Model for the Proctor Exam Seat Allocation Engine.**
//!
//! This crate turns messy, heterogeneously-formatted roster and hall data into
//! canonical, validated records. It serves as the data interchange layer between
//! raw uploaded input (spreadsheet rows of unknown shape) and the seat
//! distribution engine (`proctor_engine`).
//!
//! ## Architecture
//!
//! The crate is designed around a strict separation of concerns between
//! **normalization** and **allocation**:
//!
//! * **`index`**: Strongly-typed wrappers (`StudentIndex`, `BenchNumber`) to prevent
//!   logical indexing errors between pool positions and 1-based seat numbers.
//! * **`record`**: Canonical `Student` and `HallRecord` data plus the identifier
//!   canonicalization rules shared by every pipeline stage.
//! * **`normalize`**: The heuristic header-to-field detection pass that maps rows
//!   with arbitrary column names onto canonical records.
//! * **`roster`**: Deduplication, synthetic identifier assignment, and the stable
//!   canonical ordering required for reproducible exports.
//! * **`geometry`**: Row/column grid resolution from partial hall capacity data.
//! * **`persist`**: The JSON record-set format used to resume an allocation from a
//!   previously normalized upload.
//!
//! ## Design Philosophy
//!
//! 1. **Normalize once**: Every downstream consumer sees canonical identifiers
//!    (whitespace-stripped, uppercase) and never re-parses raw cells.
//! 2. **Degrade, don't fail**: Missing columns fall back to documented heuristics;
//!    only structurally impossible input (invalid hall geometry, absent record
//!    sets) is fatal.
//! 3. **Explicit state**: Synthetic identifier counters and random sources are
//!    passed in by the caller, never process-wide.

pub mod geometry;
pub mod index;
pub mod normalize;
pub mod persist;
pub mod record;
pub mod roster;
