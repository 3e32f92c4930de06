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

//! Day scheduling.
//!
//! An exam spans one or more days, each covering a subset of subjects. The
//! scheduler runs the distribution engine once per [`DayPlan`]: it filters
//! the full reconciled roster by the day's subject set (the roster is never
//! consumed — every day draws fresh from the same source), shuffles the
//! filtered pool, applies the layout mode, distributes, and projects.
//!
//! The **alternate** layout mode — the default — seats students only on
//! odd-numbered benches, leaving a buffer seat between neighbors: each hall's
//! effective column count and bench count are halved (rounding up) before
//! distribution, and assigned bench `i` is then remapped to physical bench
//! `(i - 1) * 2 + 1`.
//!
//! Allocation is atomic across days: a fatal condition on any day fails the
//! whole request and no partial manifest is produced.

use crate::distribute::{DistributeError, Distributor, HallAssignment, OverflowPolicy};
use crate::project::{project, HallSeating};
use crate::stats::DistributionStats;
use log::info;
use proctor_model::geometry::{HallLayout, InvalidHallGeometry};
use proctor_model::record::{canonical_subject, HallRecord, Student};
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;

/// One exam session: a label plus an optional subject filter.
///
/// An absent filter admits the entire roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    label: String,
    subjects: Option<FxHashSet<String>>,
}

impl DayPlan {
    /// Creates a day plan admitting the whole roster.
    #[inline]
    pub fn all(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            subjects: None,
        }
    }

    /// Creates a day plan admitting only the given subjects.
    ///
    /// Subjects are canonicalized, so filters match regardless of the case
    /// or padding they were written with.
    pub fn with_subjects<I, S>(label: impl Into<String>, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            label: label.into(),
            subjects: Some(
                subjects
                    .into_iter()
                    .map(|s| canonical_subject(s.as_ref()))
                    .collect(),
            ),
        }
    }

    /// Returns the day label.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` if the student sits this day.
    #[inline]
    pub fn admits(&self, student: &Student) -> bool {
        match &self.subjects {
            None => true,
            Some(subjects) => subjects.contains(&student.subject_code),
        }
    }
}

/// How benches are used within each hall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Seat only odd-numbered benches, leaving a gap between neighbors.
    ///
    /// The default when no explicit mode is requested.
    #[default]
    Alternate,
    /// Seat every bench.
    Full,
}

/// The error type for allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The distribution engine rejected a day.
    Distribute(DistributeError),
    /// A hall could not be resolved to a valid grid.
    Geometry(InvalidHallGeometry),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Distribute(e) => write!(f, "distribution failed: {e}"),
            Self::Geometry(e) => write!(f, "hall geometry error: {e}"),
        }
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Distribute(e) => Some(e),
            Self::Geometry(e) => Some(e),
        }
    }
}

impl From<DistributeError> for ScheduleError {
    fn from(e: DistributeError) -> Self {
        Self::Distribute(e)
    }
}

impl From<InvalidHallGeometry> for ScheduleError {
    fn from(e: InvalidHallGeometry) -> Self {
        Self::Geometry(e)
    }
}

/// One day's complete seating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySeating {
    label: String,
    halls: Vec<HallSeating>,
    stats: DistributionStats,
}

impl DaySeating {
    /// Returns the day label.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the projected seating per hall, in hall order.
    #[inline]
    pub fn halls(&self) -> &[HallSeating] {
        &self.halls
    }

    /// Returns the day's distribution statistics.
    #[inline]
    pub fn stats(&self) -> &DistributionStats {
        &self.stats
    }
}

/// The atomic result of one allocation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationResult {
    days: Vec<DaySeating>,
}

impl AllocationResult {
    /// Returns the per-day seatings, in day-plan order.
    #[inline]
    pub fn days(&self) -> &[DaySeating] {
        &self.days
    }

    /// Returns the manifest mapping day labels to result indices.
    pub fn manifest(&self) -> Vec<(&str, usize)> {
        self.days
            .iter()
            .enumerate()
            .map(|(index, day)| (day.label(), index))
            .collect()
    }

    /// Looks a day up by label.
    pub fn day(&self, label: &str) -> Option<&DaySeating> {
        self.days.iter().find(|d| d.label() == label)
    }
}

/// The per-day allocation orchestrator.
///
/// # Examples
///
/// ```rust
/// use proctor_engine::schedule::{LayoutMode, Scheduler};
///
/// let scheduler = Scheduler::new().layout_mode(LayoutMode::Full);
/// // scheduler.allocate(&roster, &halls, &day_plans, &mut rng)?;
/// # let _ = scheduler;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scheduler {
    distributor: Distributor,
    layout: LayoutMode,
}

impl Scheduler {
    /// Creates a scheduler with the default alternate layout and drop
    /// overflow policy.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity-overflow policy.
    #[inline]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.distributor = self.distributor.overflow_policy(policy);
        self
    }

    /// Sets the layout mode.
    #[inline]
    pub fn layout_mode(mut self, layout: LayoutMode) -> Self {
        self.layout = layout;
        self
    }

    /// Allocates seats for every day plan.
    ///
    /// With no day plans, a single unlabeled pass over the whole roster is
    /// produced. The roster is read fresh for every day; day plans with
    /// overlapping subject filters seat the same students on both days.
    ///
    /// # Errors
    ///
    /// Any fatal condition on any day aborts the entire allocation; no
    /// partial result is returned.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        roster: &[Student],
        halls: &[HallLayout],
        days: &[DayPlan],
        rng: &mut R,
    ) -> Result<AllocationResult, ScheduleError> {
        let unlabeled = [DayPlan::all("")];
        let plans: &[DayPlan] = if days.is_empty() { &unlabeled } else { days };

        let mut seatings = Vec::with_capacity(plans.len());
        for plan in plans {
            seatings.push(self.allocate_day(roster, halls, plan, rng)?);
        }

        Ok(AllocationResult { days: seatings })
    }

    fn allocate_day<R: Rng + ?Sized>(
        &self,
        roster: &[Student],
        halls: &[HallLayout],
        plan: &DayPlan,
        rng: &mut R,
    ) -> Result<DaySeating, ScheduleError> {
        let mut pool: Vec<Student> = roster
            .iter()
            .filter(|student| plan.admits(student))
            .cloned()
            .collect();
        pool.shuffle(rng);

        let (assignments, mut stats) = match self.layout {
            LayoutMode::Full => {
                let distribution = self.distributor.distribute(&pool, halls, rng)?;
                distribution.into_parts()
            }
            LayoutMode::Alternate => {
                let effective = alternate_layouts(halls)?;
                let distribution = self.distributor.distribute(&pool, &effective, rng)?;
                let (effective_assignments, stats) = distribution.into_parts();
                let assignments = halls
                    .iter()
                    .zip(effective_assignments)
                    .map(|(hall, assignment)| remap_to_odd_benches(hall, &assignment))
                    .collect();
                (assignments, stats)
            }
        };

        // Statistics count physical benches, not the halved effective layout.
        let physical_capacity: usize = halls.iter().map(|h| h.benches() as usize).sum();
        stats.empty_benches = physical_capacity - stats.placed();

        let seatings: Vec<HallSeating> = halls
            .iter()
            .zip(&assignments)
            .map(|(hall, assignment)| project(hall, assignment, &pool))
            .collect();

        info!(
            "day '{}': {} students over {} halls ({} placed, {} dropped)",
            plan.label(),
            pool.len(),
            halls.len(),
            stats.placed(),
            stats.dropped_overflow
        );

        Ok(DaySeating {
            label: plan.label().to_owned(),
            halls: seatings,
            stats,
        })
    }
}

/// Halves each hall's effective columns and benches for the alternate layout.
fn alternate_layouts(halls: &[HallLayout]) -> Result<Vec<HallLayout>, InvalidHallGeometry> {
    halls
        .iter()
        .map(|hall| {
            HallLayout::resolve(&HallRecord {
                hall_id: hall.hall_id().to_owned(),
                benches: hall.benches().div_ceil(2),
                rows: None,
                cols: Some(hall.cols().div_ceil(2)),
            })
        })
        .collect()
}

/// Remaps an effective-layout assignment onto odd physical benches:
/// assigned bench `i` lands on physical bench `(i - 1) * 2 + 1`.
fn remap_to_odd_benches(hall: &HallLayout, assignment: &HallAssignment) -> HallAssignment {
    let mut seats = vec![None; hall.benches() as usize];
    for (offset, student) in assignment.seats().iter().enumerate() {
        if student.is_some() {
            seats[offset * 2] = *student;
        }
    }
    HallAssignment::new(hall.hall_id().to_owned(), seats)
}
