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

//! The two-phase seat distribution engine.
//!
//! **Phase 1 — primary fill.** Halls are processed strictly in sequence. For
//! each hall, whole round-robin sweeps over the subject queues are batched
//! until the batch covers the hall's capacity or the queues are exhausted;
//! the batch then fills benches `1, 2, 3, ...` in order. Because a sweep
//! never takes two students of the same subject, consecutive benches rarely
//! share one while at least two subjects remain. A sweep is taken whole, so
//! the last sweep of a full hall can overshoot its capacity — the overshoot
//! becomes the leftover set. A hall whose fill ends because the queues ran
//! dry keeps its remaining benches empty even if later halls had room.
//!
//! **Phase 2 — backfill.** Leftovers are placed into empty benches across all
//! halls in hall-then-bench order, in their group-drain order, until either
//! side is exhausted.
//!
//! Students that fit in neither phase are handled per [`OverflowPolicy`]:
//! counted and dropped (default), or rejected up front with a fatal
//! [`DistributeError::CapacityOverflow`]. A rejected run produces nothing.

use crate::queue::SubjectQueues;
use crate::stats::DistributionStats;
use log::{debug, info};
use proctor_model::geometry::HallLayout;
use proctor_model::index::{BenchNumber, StudentIndex};
use proctor_model::record::Student;
use rand::Rng;

/// What to do when the pool exceeds the total bench capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Seat as many students as fit; count the rest as dropped.
    ///
    /// The default, matching the behavior allocation consumers historically
    /// relied on — but the drop count is reported, never silent.
    #[default]
    Drop,
    /// Fail the whole distribution before placing anyone.
    Reject,
}

/// The error type for distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributeError {
    /// The pool exceeds total capacity and the policy is [`OverflowPolicy::Reject`].
    CapacityOverflow {
        /// Students in the pool.
        pool_size: usize,
        /// Total benches across all halls.
        capacity: usize,
    },
}

impl std::fmt::Display for DistributeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityOverflow {
                pool_size,
                capacity,
            } => write!(
                f,
                "pool of {pool_size} students exceeds total hall capacity of {capacity} benches"
            ),
        }
    }
}

impl std::error::Error for DistributeError {}

/// One hall's bench-to-student assignment.
///
/// `seats[i]` holds the student on bench `i + 1`; benches form a dense range
/// and unassigned benches are `None`, never omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HallAssignment {
    hall_id: String,
    seats: Vec<Option<StudentIndex>>,
}

impl HallAssignment {
    #[inline]
    pub(crate) fn new(hall_id: String, seats: Vec<Option<StudentIndex>>) -> Self {
        Self { hall_id, seats }
    }

    /// Returns the hall identifier.
    #[inline]
    pub fn hall_id(&self) -> &str {
        &self.hall_id
    }

    /// Returns the number of benches.
    #[inline]
    pub fn benches(&self) -> u32 {
        self.seats.len() as u32
    }

    /// Returns the dense seat slice (`seats[i]` is bench `i + 1`).
    #[inline]
    pub fn seats(&self) -> &[Option<StudentIndex>] {
        &self.seats
    }

    /// Returns the student on a bench, if any.
    ///
    /// # Panics
    ///
    /// Panics if `bench` exceeds the hall's bench count.
    #[inline]
    pub fn student_at(&self, bench: BenchNumber) -> Option<StudentIndex> {
        self.seats[bench.offset()]
    }

    /// Returns the number of occupied benches.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }
}

/// The result of one distribution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    halls: Vec<HallAssignment>,
    stats: DistributionStats,
}

impl Distribution {
    /// Returns the per-hall assignments, in hall order.
    #[inline]
    pub fn halls(&self) -> &[HallAssignment] {
        &self.halls
    }

    /// Returns the run statistics.
    #[inline]
    pub fn stats(&self) -> &DistributionStats {
        &self.stats
    }

    /// Decomposes into assignments and statistics.
    #[inline]
    pub fn into_parts(self) -> (Vec<HallAssignment>, DistributionStats) {
        (self.halls, self.stats)
    }
}

/// The configurable distribution engine.
///
/// # Examples
///
/// ```rust
/// use proctor_engine::distribute::{Distributor, OverflowPolicy};
///
/// let engine = Distributor::new().overflow_policy(OverflowPolicy::Reject);
/// // engine.distribute(&pool, &halls, &mut rng)?;
/// # let _ = engine;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Distributor {
    overflow: OverflowPolicy,
}

impl Distributor {
    /// Creates an engine with the default (drop) overflow policy.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity-overflow policy.
    #[inline]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    /// Distributes a day pool across halls.
    ///
    /// The pool slice is read-only; assignments refer to it by
    /// [`StudentIndex`]. Randomization comes entirely from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`DistributeError::CapacityOverflow`] when the pool exceeds
    /// total capacity under [`OverflowPolicy::Reject`]. Nothing is placed in
    /// that case.
    pub fn distribute<R: Rng + ?Sized>(
        &self,
        pool: &[Student],
        halls: &[HallLayout],
        rng: &mut R,
    ) -> Result<Distribution, DistributeError> {
        let capacity: usize = halls.iter().map(|h| h.benches() as usize).sum();

        if self.overflow == OverflowPolicy::Reject && pool.len() > capacity {
            return Err(DistributeError::CapacityOverflow {
                pool_size: pool.len(),
                capacity,
            });
        }

        let mut stats = DistributionStats {
            pool_size: pool.len(),
            capacity,
            ..DistributionStats::default()
        };

        let mut queues = SubjectQueues::build(pool, rng);
        debug!(
            "distributing {} students ({} subjects) across {} halls ({} benches)",
            pool.len(),
            queues.num_groups(),
            halls.len(),
            capacity
        );

        let (mut assignments, leftovers) = primary_fill(&mut queues, halls, &mut stats);
        backfill(&mut assignments, leftovers, &mut stats);

        stats.dropped_overflow = pool.len() - stats.placed();
        stats.empty_benches = capacity - stats.placed();

        info!(
            "placed {} of {} students ({} primary, {} backfill, {} dropped, {} benches empty)",
            stats.placed(),
            stats.pool_size,
            stats.placed_primary,
            stats.placed_backfill,
            stats.dropped_overflow,
            stats.empty_benches
        );

        debug_assert_eq!(
            stats.placed(),
            pool.len().min(capacity),
            "distribution must cover min(pool, capacity) seats"
        );

        Ok(Distribution {
            halls: assignments,
            stats,
        })
    }
}

/// Phase 1: fill each hall in sequence from whole round-robin sweeps.
///
/// Returns the per-hall assignments and the leftover students (sweep
/// overshoot) in the order they were taken.
fn primary_fill(
    queues: &mut SubjectQueues,
    halls: &[HallLayout],
    stats: &mut DistributionStats,
) -> (Vec<HallAssignment>, Vec<StudentIndex>) {
    let mut leftovers: Vec<StudentIndex> = Vec::new();
    let mut batch: Vec<StudentIndex> = Vec::new();
    let mut assignments = Vec::with_capacity(halls.len());

    for hall in halls {
        let capacity = hall.benches() as usize;
        batch.clear();
        while batch.len() < capacity && queues.sweep_into(&mut batch) > 0 {}

        let mut seats = vec![None; capacity];
        for (offset, student) in batch.drain(..).enumerate() {
            if offset < capacity {
                seats[offset] = Some(student);
                stats.on_primary_placement();
            } else {
                leftovers.push(student);
            }
        }

        debug!(
            "hall '{}': {}/{} benches filled in primary pass",
            hall.hall_id(),
            seats.iter().filter(|s| s.is_some()).count(),
            capacity
        );

        assignments.push(HallAssignment::new(hall.hall_id().to_owned(), seats));
    }

    (assignments, leftovers)
}

/// Phase 2: place leftovers into empty benches in hall-then-bench order.
///
/// Leftovers that find no empty bench remain unplaced and are accounted as
/// overflow by the caller.
fn backfill(
    assignments: &mut [HallAssignment],
    leftovers: Vec<StudentIndex>,
    stats: &mut DistributionStats,
) {
    let mut remaining = leftovers.into_iter();
    for hall in assignments.iter_mut() {
        for seat in hall.seats.iter_mut() {
            if seat.is_none() {
                match remaining.next() {
                    Some(student) => {
                        *seat = Some(student);
                        stats.on_backfill_placement();
                    }
                    None => return,
                }
            }
        }
    }
}
