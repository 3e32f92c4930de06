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

use serde::Serialize;

/// Statistics collected during one distribution run.
///
/// Capacity overflow under the drop policy and backfilled leftovers were
/// silent in older systems; here every correction is counted and surfaced
/// alongside the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DistributionStats {
    /// Students in the (filtered, shuffled) day pool.
    pub pool_size: usize,
    /// Total benches across all halls in effect for the run.
    pub capacity: usize,
    /// Students seated by the primary round-robin fill.
    pub placed_primary: usize,
    /// Students seated by the leftover backfill pass.
    pub placed_backfill: usize,
    /// Students not seated because capacity ran out (drop policy only).
    pub dropped_overflow: usize,
    /// Benches left without a student.
    pub empty_benches: usize,
}

impl DistributionStats {
    #[inline]
    pub fn on_primary_placement(&mut self) {
        self.placed_primary += 1;
    }

    #[inline]
    pub fn on_backfill_placement(&mut self) {
        self.placed_backfill += 1;
    }

    /// Total students seated across both phases.
    #[inline]
    pub fn placed(&self) -> usize {
        self.placed_primary + self.placed_backfill
    }
}

impl std::fmt::Display for DistributionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Distribution Statistics:")?;
        writeln!(f, "  Pool size:          {}", self.pool_size)?;
        writeln!(f, "  Capacity:           {}", self.capacity)?;
        writeln!(f, "  Placed (primary):   {}", self.placed_primary)?;
        writeln!(f, "  Placed (backfill):  {}", self.placed_backfill)?;
        writeln!(f, "  Dropped (overflow): {}", self.dropped_overflow)?;
        writeln!(f, "  Empty benches:      {}", self.empty_benches)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placed_sums_phases() {
        let mut stats = DistributionStats::default();
        stats.on_primary_placement();
        stats.on_primary_placement();
        stats.on_backfill_placement();
        assert_eq!(stats.placed(), 3);
        assert_eq!(stats.placed_primary, 2);
        assert_eq!(stats.placed_backfill, 1);
    }

    #[test]
    fn test_display_lists_all_counters() {
        let stats = DistributionStats {
            pool_size: 5,
            capacity: 3,
            placed_primary: 3,
            placed_backfill: 0,
            dropped_overflow: 2,
            empty_benches: 0,
        };
        let rendered = format!("{}", stats);
        assert!(rendered.contains("Pool size:          5"));
        assert!(rendered.contains("Dropped (overflow): 2"));
    }
}
