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

//! Roster reconciliation.
//!
//! Normalized student records may arrive concatenated from several source
//! files, with duplicate register numbers and records that carry none at all.
//! Reconciliation produces the one roster every later stage consumes:
//!
//! 1. **Dedup**: iterate in input order; a record whose non-empty identifier
//!    was already seen is dropped. First occurrence wins. This is a lossy
//!    policy by design; the dropped count is surfaced in the report.
//! 2. **Synthesis**: records still missing an identifier receive `SYN0001`,
//!    `SYN0002`, ... in input order, skipping any value that would collide
//!    with an existing identifier.
//! 3. **Ordering**: the roster is sorted by identifier using ordinal string
//!    comparison. Not numeric, not locale-aware, just reproducible.
//!
//! The synthetic counter is an explicit state object scoped to one call;
//! nothing here touches process-wide state.

use crate::record::{canonical_register, Student};
use rustc_hash::FxHashSet;

/// Generator for synthetic register numbers `SYN0001`, `SYN0002`, ...
///
/// Zero-padded to four digits, monotonically increasing within one sequence.
/// Create one per reconciliation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticIdSequence {
    next: u32,
}

impl Default for SyntheticIdSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl SyntheticIdSequence {
    /// Creates a sequence starting at `SYN0001`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next identifier in the sequence.
    #[inline]
    pub fn next_id(&mut self) -> String {
        let id = format!("SYN{:04}", self.next);
        self.next += 1;
        id
    }
}

/// Counts of the corrections applied during one reconciliation.
///
/// Duplicate and missing identifiers are corrected by policy, not reported as
/// errors; this report is how callers learn that the input was not clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// Records seen in the input, before any correction.
    pub input_records: usize,
    /// Later occurrences of an already-seen identifier, dropped.
    pub duplicates_dropped: usize,
    /// Records that received a synthetic identifier.
    pub ids_synthesized: usize,
}

impl std::fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "reconciled {} records ({} duplicates dropped, {} identifiers synthesized)",
            self.input_records, self.duplicates_dropped, self.ids_synthesized
        )
    }
}

/// Reconciles a concatenated record sequence into the canonical roster.
///
/// Convenience wrapper around [`reconcile_with`] using a fresh
/// [`SyntheticIdSequence`].
#[inline]
pub fn reconcile(records: Vec<Student>) -> (Vec<Student>, ReconcileReport) {
    reconcile_with(records, &mut SyntheticIdSequence::new())
}

/// Reconciles a concatenated record sequence with a caller-supplied synthetic
/// identifier sequence.
///
/// Identifiers are re-canonicalized on the way in, which is a no-op for
/// records produced by the normalizer but protects persisted record sets that
/// predate a canonicalization rule.
pub fn reconcile_with(
    records: Vec<Student>,
    ids: &mut SyntheticIdSequence,
) -> (Vec<Student>, ReconcileReport) {
    let mut report = ReconcileReport {
        input_records: records.len(),
        ..ReconcileReport::default()
    };

    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut roster: Vec<Student> = Vec::with_capacity(records.len());

    for mut record in records {
        record.register_number = canonical_register(&record.register_number);
        if !record.register_number.is_empty() && !seen.insert(record.register_number.clone()) {
            report.duplicates_dropped += 1;
            continue;
        }
        roster.push(record);
    }

    for record in roster.iter_mut().filter(|r| r.register_number.is_empty()) {
        // Skip synthetic values that collide with a real identifier.
        let id = loop {
            let candidate = ids.next_id();
            if seen.insert(candidate.clone()) {
                break candidate;
            }
        };
        record.register_number = id;
        report.ids_synthesized += 1;
    }

    roster.sort_by(|a, b| a.register_number.cmp(&b.register_number));

    (roster, report)
}
