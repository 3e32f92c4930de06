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

//! Result projection.
//!
//! Turns a hall's sparse bench-to-student assignment into the dense,
//! export-ready record set collaborators consume: one record per bench from
//! 1 to the hall's capacity, each annotated with its resolved row/column
//! coordinates. Empty benches appear with blank identifying fields, never
//! omitted — export layers rely on the enumeration being complete.

use crate::distribute::HallAssignment;
use proctor_model::geometry::HallLayout;
use proctor_model::index::BenchNumber;
use proctor_model::record::Student;
use serde::Serialize;

/// One bench in the final output, occupied or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchRecord {
    /// The hall this bench belongs to.
    pub hall_id: String,
    /// The 1-based bench number.
    pub bench: BenchNumber,
    /// The 1-based grid row.
    pub row: u32,
    /// The 1-based grid column.
    pub col: u32,
    /// The seated student's register number, or blank.
    pub register_number: String,
    /// The seated student's name, or blank.
    pub student_name: String,
    /// The seated student's subject code, or blank.
    pub subject_code: String,
}

impl BenchRecord {
    /// Returns `true` if no student sits on this bench.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.register_number.is_empty()
    }
}

/// The complete projected seating of one hall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HallSeating {
    hall_id: String,
    benches: Vec<BenchRecord>,
}

impl HallSeating {
    /// Returns the hall identifier.
    #[inline]
    pub fn hall_id(&self) -> &str {
        &self.hall_id
    }

    /// Returns the dense per-bench records, bench 1 first.
    #[inline]
    pub fn benches(&self) -> &[BenchRecord] {
        &self.benches
    }

    /// Returns the number of occupied benches.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.benches.iter().filter(|b| !b.is_empty()).count()
    }
}

impl std::fmt::Display for HallSeating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Hall {}", self.hall_id)?;
        writeln!(
            f,
            "   {:<6} | {:<4} | {:<4} | {:<14} | {:<10}",
            "Bench", "Row", "Col", "Register", "Subject"
        )?;
        writeln!(f, "   {:-<6}-+-{:-<4}-+-{:-<4}-+-{:-<14}-+-{:-<10}", "", "", "", "", "")?;
        for b in &self.benches {
            writeln!(
                f,
                "   {:<6} | {:<4} | {:<4} | {:<14} | {:<10}",
                b.bench.get(),
                b.row,
                b.col,
                b.register_number,
                b.subject_code
            )?;
        }
        Ok(())
    }
}

/// Projects one hall's assignment onto dense bench records.
///
/// `pool` must be the same slice the assignment's indices were produced from.
///
/// # Panics
///
/// In debug builds, this function will panic if the assignment's bench count
/// does not match the hall's.
pub fn project(hall: &HallLayout, assignment: &HallAssignment, pool: &[Student]) -> HallSeating {
    debug_assert_eq!(
        assignment.benches(),
        hall.benches(),
        "called `project` with mismatched bench counts: the hall has {} benches but the assignment covers {}",
        hall.benches(),
        assignment.benches()
    );

    let benches = (1..=hall.benches())
        .map(|number| {
            let bench = BenchNumber::new(number);
            let (row, col) = hall.bench_position(bench);
            let student = assignment.student_at(bench).map(|i| &pool[i.get()]);
            BenchRecord {
                hall_id: hall.hall_id().to_owned(),
                bench,
                row,
                col,
                register_number: student.map(|s| s.register_number.clone()).unwrap_or_default(),
                student_name: student.map(|s| s.student_name.clone()).unwrap_or_default(),
                subject_code: student.map(|s| s.subject_code.clone()).unwrap_or_default(),
            }
        })
        .collect();

    HallSeating {
        hall_id: hall.hall_id().to_owned(),
        benches,
    }
}
