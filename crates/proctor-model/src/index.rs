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

//! Strongly typed positions for the allocation pipeline.
//!
//! Two index spaces coexist during distribution: positions into a day's
//! student pool (0-based) and seat numbers within a hall (1-based, dense).
//! Raw integers invite accidental swaps between the two, so each space gets
//! its own transparent wrapper. Both compile down to their underlying
//! integer with no runtime overhead.

use serde::{Deserialize, Serialize};

/// A 0-based position into a day's student pool.
///
/// A `StudentIndex` is only meaningful relative to the pool slice it was
/// produced from; it is never persisted.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentIndex(usize);

impl StudentIndex {
    /// Creates a new `StudentIndex` for the given pool position.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying 0-based pool position.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Debug for StudentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StudentIndex({})", self.0)
    }
}

impl std::fmt::Display for StudentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StudentIndex({})", self.0)
    }
}

impl From<usize> for StudentIndex {
    #[inline]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl From<StudentIndex> for usize {
    #[inline]
    fn from(index: StudentIndex) -> Self {
        index.get()
    }
}

/// A 1-based seat number within a hall.
///
/// Bench numbers form a dense range `1..=benches` per hall. The row/column
/// coordinates of a bench are derived by [`crate::geometry::HallLayout`].
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchNumber(u32);

impl BenchNumber {
    /// Creates a new `BenchNumber`.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if `number` is zero.
    #[inline]
    pub fn new(number: u32) -> Self {
        debug_assert!(
            number >= 1,
            "called `BenchNumber::new` with a zero bench number: bench numbers are 1-based"
        );

        Self(number)
    }

    /// Returns the underlying 1-based seat number.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the 0-based offset of this bench within its hall.
    #[inline]
    pub const fn offset(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl std::fmt::Debug for BenchNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BenchNumber({})", self.0)
    }
}

impl std::fmt::Display for BenchNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BenchNumber({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_index_roundtrip() {
        let i = StudentIndex::new(7);
        assert_eq!(i.get(), 7);
        assert_eq!(usize::from(i), 7);
        assert_eq!(StudentIndex::from(7usize), i);
        assert_eq!(format!("{}", i), "StudentIndex(7)");
    }

    #[test]
    fn test_bench_number_is_one_based() {
        let b = BenchNumber::new(1);
        assert_eq!(b.get(), 1);
        assert_eq!(b.offset(), 0);

        let b = BenchNumber::new(30);
        assert_eq!(b.offset(), 29);
        assert_eq!(format!("{}", b), "BenchNumber(30)");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "bench numbers are 1-based")]
    fn test_bench_number_rejects_zero() {
        let _ = BenchNumber::new(0);
    }
}
