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

//! Hall geometry resolution.
//!
//! Source data rarely describes a full seating grid. This module derives a
//! complete `rows x cols` grid from whatever partial capacity information a
//! [`HallRecord`] carries, upholding the invariant `rows * cols >= benches`.
//!
//! Resolution policy:
//! * neither dimension given: `cols = 10`, `rows = ceil(benches / cols)`;
//! * only `rows` given: `cols = ceil(benches / rows)`;
//! * only `cols` given: `rows = ceil(benches / cols)`;
//! * both given but too small: `rows` is authoritative, `cols` is recomputed
//!   as `ceil(benches / rows)`.
//!
//! Benches are numbered 1-based in row-major order: bench `b` sits at
//! `row = ceil(b / cols)`, `col = ((b - 1) mod cols) + 1`.

use crate::index::BenchNumber;
use crate::record::HallRecord;
use serde::{Deserialize, Serialize};

/// Column count assumed when a hall carries no grid information at all.
pub const DEFAULT_COLS: u32 = 10;

/// The error produced when a hall cannot be resolved to a valid grid.
///
/// Fatal for the allocation request: a hall with a non-positive bench count
/// or an explicit zero dimension cannot seat anyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidHallGeometry {
    /// The offending hall.
    pub hall_id: String,
    /// Bench count as provided.
    pub benches: u32,
    /// Rows as provided.
    pub rows: Option<u32>,
    /// Cols as provided.
    pub cols: Option<u32>,
}

impl std::fmt::Display for InvalidHallGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hall '{}' has invalid geometry: benches = {}, rows = {:?}, cols = {:?} (all dimensions must be positive)",
            self.hall_id, self.benches, self.rows, self.cols
        )
    }
}

impl std::error::Error for InvalidHallGeometry {}

/// A hall with a fully resolved seating grid.
///
/// Constructed only through [`HallLayout::resolve`] (or the
/// [`uniform_halls`] generator), so the invariant `rows * cols >= benches`
/// holds for every value of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallLayout {
    hall_id: String,
    benches: u32,
    rows: u32,
    cols: u32,
}

impl HallLayout {
    /// Resolves a hall record into a complete grid.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHallGeometry`] if `benches` is zero or either given
    /// dimension is zero.
    pub fn resolve(record: &HallRecord) -> Result<Self, InvalidHallGeometry> {
        let invalid = || InvalidHallGeometry {
            hall_id: record.hall_id.clone(),
            benches: record.benches,
            rows: record.rows,
            cols: record.cols,
        };

        let benches = record.benches;
        if benches == 0 || record.rows == Some(0) || record.cols == Some(0) {
            return Err(invalid());
        }

        let (rows, cols) = match (record.rows, record.cols) {
            (None, None) => (benches.div_ceil(DEFAULT_COLS), DEFAULT_COLS),
            (Some(rows), None) => (rows, benches.div_ceil(rows)),
            (None, Some(cols)) => (benches.div_ceil(cols), cols),
            (Some(rows), Some(cols)) => {
                if rows * cols < benches {
                    // Rows are authoritative; widen the grid.
                    (rows, benches.div_ceil(rows))
                } else {
                    (rows, cols)
                }
            }
        };

        debug_assert!(
            rows * cols >= benches,
            "resolved geometry violates the capacity invariant: {rows} * {cols} < {benches}"
        );

        Ok(Self {
            hall_id: record.hall_id.clone(),
            benches,
            rows,
            cols,
        })
    }

    /// Resolves a whole hall table, failing on the first invalid hall.
    pub fn resolve_all(records: &[HallRecord]) -> Result<Vec<Self>, InvalidHallGeometry> {
        records.iter().map(Self::resolve).collect()
    }

    /// Returns the hall identifier.
    #[inline]
    pub fn hall_id(&self) -> &str {
        &self.hall_id
    }

    /// Returns the seat count.
    #[inline]
    pub fn benches(&self) -> u32 {
        self.benches
    }

    /// Returns the resolved row count.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the resolved column count.
    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Returns the `(row, col)` coordinates of a bench, both 1-based.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if `bench` exceeds the hall's
    /// bench count.
    #[inline]
    pub fn bench_position(&self, bench: BenchNumber) -> (u32, u32) {
        debug_assert!(
            bench.get() <= self.benches,
            "called `HallLayout::bench_position` with bench out of range: the hall has {} benches but the bench is {}",
            self.benches,
            bench.get()
        );

        let b = bench.get();
        (b.div_ceil(self.cols), (b - 1) % self.cols + 1)
    }
}

/// Generates `count` identical halls named `Hall_1..Hall_<count>`.
///
/// This is the programmatic alternative to file-provided hall definitions:
/// a hall-count/bench-count pair with uniform capacity and default geometry.
///
/// # Errors
///
/// Returns [`InvalidHallGeometry`] if `benches_each` is zero.
pub fn uniform_halls(count: u32, benches_each: u32) -> Result<Vec<HallLayout>, InvalidHallGeometry> {
    (1..=count)
        .map(|n| HallLayout::resolve(&HallRecord::new(format!("Hall_{n}"), benches_each)))
        .collect()
}
