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

//! Record normalizer for rows of unknown shape.
//!
//! Uploaded rosters arrive with arbitrary column headers ("Student Name
//! (Reg.No)", "Programme", "roll"), combined `LEFT (RIGHT)` cells, and halls
//! described by anything from a bare capacity to a full grid. This module
//! turns one such row into a canonical [`Student`] or [`HallRecord`].
//!
//! Column identification is a prioritized field-detection pass over a generic
//! header/value row: an explicit, ordered rule table maps hint substrings to
//! field roles. Matching is case-insensitive substring containment; the first
//! matching column wins per role, each column serves at most one role, and
//! hints earlier in the table claim columns before later hints see them.
//!
//! The normalizer never fails on malformed input. A row with no identifiable
//! columns degrades to documented fallbacks (whole-cell values, a scan for a
//! plausible subject code, default bench counts) rather than an error. The
//! heuristics here are load-bearing for compatibility with previously
//! ingested data and must not be "improved" casually.

use crate::record::{canonical_register, canonical_subject, HallRecord, Student};
use regex::Regex;
use rustc_hash::FxHashMap;

/// Default bench count for halls whose capacity cell is missing or unparsable.
pub const DEFAULT_BENCHES: u32 = 30;

/// Longest cell value the subject fallback scan will accept as a code.
pub const MAX_SUBJECT_CODE_LEN: usize = 8;

/// The combined-cell pattern: `LEFT (RIGHT)` split at the last parenthetical.
const COMBINED_CELL_PATTERN: &str = r"^(.+?)\s*\(\s*([^)]+)\s*\)\s*$";

/// The roles a column can play in a student row.
///
/// Variants are ordered by detection priority; see [`STUDENT_HINTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentField {
    /// A combined `name (register)` column.
    Combined,
    /// A plain name column.
    Name,
    /// A register / roll number column.
    Register,
    /// A combined `course name (code)` column.
    Course,
    /// A plain subject code column.
    Subject,
}

/// The roles a column can play in a hall row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HallField {
    /// The hall identifier column.
    HallId,
    /// The seat capacity column.
    Benches,
    /// The grid row count column.
    Rows,
    /// The grid column count column.
    Cols,
}

/// Hint substrings for student columns, in detection priority order.
///
/// Earlier entries claim columns first: a header like "Student Name" is
/// claimed by the `"student"` hint as a combined column before the `"name"`
/// hint ever sees it.
pub const STUDENT_HINTS: &[(&str, StudentField)] = &[
    ("student", StudentField::Combined),
    ("name", StudentField::Name),
    ("reg", StudentField::Register),
    ("register", StudentField::Register),
    ("roll", StudentField::Register),
    ("course", StudentField::Course),
    ("programme", StudentField::Course),
    ("sub", StudentField::Subject),
    ("subject", StudentField::Subject),
    ("code", StudentField::Subject),
];

/// Hint substrings for hall columns, in detection priority order.
pub const HALL_HINTS: &[(&str, HallField)] = &[
    ("hall", HallField::HallId),
    ("class", HallField::HallId),
    ("room", HallField::HallId),
    ("id", HallField::HallId),
    ("bench", HallField::Benches),
    ("seat", HallField::Benches),
    ("capacity", HallField::Benches),
    ("rows", HallField::Rows),
    ("cols", HallField::Cols),
    ("column", HallField::Cols),
];

/// One raw tabular row: an ordered sequence of `(header, value)` cells.
///
/// Column order matters for the fallback heuristics (the subject-code scan
/// picks the *first* plausible cell), so rows preserve source order instead
/// of using a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    /// Creates an empty row.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell to the row, preserving column order.
    #[inline]
    pub fn push(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.push((header.into(), value.into()));
    }

    /// Returns the number of cells in the row.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the row has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over `(header, value)` cells in column order.
    #[inline]
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    #[inline]
    fn value(&self, column: usize) -> &str {
        &self.cells[column].1
    }
}

impl<H: Into<String>, V: Into<String>> FromIterator<(H, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (H, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(h, v)| (h.into(), v.into()))
                .collect(),
        }
    }
}

/// Runs the prioritized field-detection pass over a row's headers.
///
/// Returns a role-to-column map. Each role is assigned at most one column and
/// each column serves at most one role; the hint table's order decides which
/// role claims a contested column.
fn detect_roles<F>(row: &RawRow, hints: &[(&str, F)]) -> FxHashMap<F, usize>
where
    F: Copy + PartialEq + Eq + std::hash::Hash,
{
    let lowered: Vec<String> = row.cells().map(|(h, _)| h.to_lowercase()).collect();

    let mut roles: FxHashMap<F, usize> = FxHashMap::default();
    let mut claimed = vec![false; lowered.len()];

    for &(hint, role) in hints {
        if roles.contains_key(&role) {
            continue;
        }
        for (column, header) in lowered.iter().enumerate() {
            if !claimed[column] && header.contains(hint) {
                roles.insert(role, column);
                claimed[column] = true;
                break;
            }
        }
    }

    roles
}

/// A configurable normalizer for student and hall rows.
///
/// # Configuration
///
/// * `default_benches`: the capacity assumed for halls whose bench cell is
///   missing or unparsable (default [`DEFAULT_BENCHES`]).
///
/// # Examples
///
/// ```rust
/// use proctor_model::normalize::{RawRow, RowNormalizer};
///
/// let row: RawRow = [
///     ("Student Name (Reg.No)", "Ada Lovelace (21bca042)"),
///     ("Programme", "Computer Applications (BCA)"),
/// ]
/// .into_iter()
/// .collect();
///
/// let student = RowNormalizer::new().normalize_student_row(&row);
/// assert_eq!(student.register_number, "21BCA042");
/// assert_eq!(student.student_name, "Ada Lovelace");
/// assert_eq!(student.subject_code, "BCA");
/// ```
#[derive(Debug, Clone)]
pub struct RowNormalizer {
    default_benches: u32,
    combined: Regex,
}

impl Default for RowNormalizer {
    fn default() -> Self {
        Self {
            default_benches: DEFAULT_BENCHES,
            combined: Regex::new(COMBINED_CELL_PATTERN).expect("combined-cell pattern is valid"),
        }
    }
}

impl RowNormalizer {
    /// Creates a normalizer with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bench count assumed for halls with a missing or unparsable
    /// capacity cell.
    #[inline]
    pub fn default_benches(mut self, benches: u32) -> Self {
        self.default_benches = benches;
        self
    }

    /// Splits a combined `LEFT (RIGHT)` cell.
    ///
    /// Preference order:
    /// 1. the regex `^(.+?)\s*\(\s*([^)]+)\s*\)\s*$` (last top-level
    ///    parenthetical);
    /// 2. if the value ends with `)`, a split at the last `(`;
    /// 3. otherwise the whole value is the left part and the right is empty.
    pub fn split_combined(&self, cell: &str) -> (String, String) {
        if let Some(caps) = self.combined.captures(cell) {
            return (caps[1].trim().to_owned(), caps[2].trim().to_owned());
        }

        let trimmed = cell.trim_end();
        if trimmed.ends_with(')') {
            if let Some(open) = trimmed.rfind('(') {
                let left = trimmed[..open].trim();
                let right = trimmed[open + 1..trimmed.len() - 1].trim();
                return (left.to_owned(), right.to_owned());
            }
        }

        (cell.trim().to_owned(), String::new())
    }

    /// Normalizes one student row.
    ///
    /// Never fails: rows with no identifiable columns degrade to empty fields
    /// (an empty register number is later synthesized by the reconciler) and
    /// the subject falls back to a scan for the first short alphanumeric cell
    /// value not under a "name" header.
    pub fn normalize_student_row(&self, row: &RawRow) -> Student {
        let roles = detect_roles(row, STUDENT_HINTS);

        let mut student_name = String::new();
        let mut register_number = String::new();

        if let Some(&column) = roles.get(&StudentField::Combined) {
            let (name, register) = self.split_combined(row.value(column));
            student_name = name;
            register_number = register;
        }
        if student_name.is_empty() {
            if let Some(&column) = roles.get(&StudentField::Name) {
                student_name = row.value(column).trim().to_owned();
            }
        }
        if register_number.is_empty() {
            if let Some(&column) = roles.get(&StudentField::Register) {
                register_number = row.value(column).to_owned();
            }
        }

        let mut subject_name = String::new();
        let mut subject_code = String::new();

        if let Some(&column) = roles.get(&StudentField::Course) {
            let (name, code) = self.split_combined(row.value(column));
            if code.is_empty() {
                // No parenthetical: the whole cell is the code.
                subject_code = name;
            } else {
                subject_name = name;
                subject_code = code;
            }
        } else if let Some(&column) = roles.get(&StudentField::Subject) {
            subject_code = row.value(column).to_owned();
        }

        if subject_code.trim().is_empty() {
            subject_code = scan_for_subject_code(row).unwrap_or_default();
        }

        Student {
            register_number: canonical_register(&register_number),
            student_name,
            subject_code: canonical_subject(&subject_code),
            subject_name,
        }
    }

    /// Normalizes one hall row.
    ///
    /// `row_index` is the 0-based position of the row in its source table and
    /// feeds the `Hall_<n>` default identifier (1-based).
    pub fn normalize_hall_row(&self, row: &RawRow, row_index: usize) -> HallRecord {
        let roles = detect_roles(row, HALL_HINTS);

        let hall_id = roles
            .get(&HallField::HallId)
            .map(|&column| row.value(column).trim().to_owned())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("Hall_{}", row_index + 1));

        let benches = roles
            .get(&HallField::Benches)
            .and_then(|&column| parse_positive(row.value(column)))
            .unwrap_or(self.default_benches);

        let rows = roles
            .get(&HallField::Rows)
            .and_then(|&column| parse_positive(row.value(column)));
        let cols = roles
            .get(&HallField::Cols)
            .and_then(|&column| parse_positive(row.value(column)));

        HallRecord {
            hall_id,
            benches,
            rows,
            cols,
        }
    }

    /// Normalizes a whole student table.
    pub fn normalize_student_rows<'a, I>(&self, rows: I) -> Vec<Student>
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        rows.into_iter()
            .map(|row| self.normalize_student_row(row))
            .collect()
    }

    /// Normalizes a whole hall table.
    pub fn normalize_hall_rows<'a, I>(&self, rows: I) -> Vec<HallRecord>
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| self.normalize_hall_row(row, index))
            .collect()
    }
}

/// The subject fallback: the first cell value that is short, alphanumeric,
/// and not under a header containing "name".
fn scan_for_subject_code(row: &RawRow) -> Option<String> {
    row.cells().find_map(|(header, value)| {
        let candidate = value.trim();
        let plausible = !candidate.is_empty()
            && candidate.len() <= MAX_SUBJECT_CODE_LEN
            && candidate.chars().all(|c| c.is_ascii_alphanumeric())
            && !header.to_lowercase().contains("name");
        plausible.then(|| candidate.to_owned())
    })
}

/// Parses a strictly positive integer cell, tolerating surrounding whitespace
/// and a trailing `.0` from spreadsheet float formatting.
fn parse_positive(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let integral = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    integral.parse::<u32>().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_detect_roles_first_match_wins() {
        let r = row(&[
            ("Serial", "1"),
            ("Register Number", "R1"),
            ("Reg No (old)", "R0"),
        ]);
        let roles = detect_roles(&r, STUDENT_HINTS);
        // Both headers contain "reg"; the earlier column wins.
        assert_eq!(roles.get(&StudentField::Register), Some(&1));
    }

    #[test]
    fn test_detect_roles_column_serves_one_role() {
        // "Student Name" matches both the combined and the name hints; the
        // combined hint is earlier in the table and claims the column, so no
        // name column is detected.
        let r = row(&[("Student Name", "Ada (R1)")]);
        let roles = detect_roles(&r, STUDENT_HINTS);
        assert_eq!(roles.get(&StudentField::Combined), Some(&0));
        assert_eq!(roles.get(&StudentField::Name), None);
    }

    #[test]
    fn test_split_combined_regex_path() {
        let n = RowNormalizer::new();
        assert_eq!(
            n.split_combined("Ada Lovelace ( 21bca042 )"),
            ("Ada Lovelace".to_owned(), "21bca042".to_owned())
        );
        // Last parenthetical wins.
        assert_eq!(
            n.split_combined("Physics (Hons) (PHY)"),
            ("Physics (Hons)".to_owned(), "PHY".to_owned())
        );
    }

    #[test]
    fn test_split_combined_last_paren_fallback() {
        let n = RowNormalizer::new();
        // Empty parenthetical defeats the regex but still ends with ')'.
        assert_eq!(n.split_combined("Ada ()"), ("Ada".to_owned(), "".to_owned()));
    }

    #[test]
    fn test_split_combined_whole_cell_fallback() {
        let n = RowNormalizer::new();
        assert_eq!(
            n.split_combined("  Ada Lovelace  "),
            ("Ada Lovelace".to_owned(), "".to_owned())
        );
    }

    #[test]
    fn test_student_row_combined_and_course() {
        let r = row(&[
            ("Student (Reg)", "ada lovelace (21 bca 042)"),
            ("Course", "Computer Applications (bca)"),
        ]);
        let s = RowNormalizer::new().normalize_student_row(&r);
        assert_eq!(s.register_number, "21BCA042");
        assert_eq!(s.student_name, "ada lovelace");
        assert_eq!(s.subject_code, "BCA");
        assert_eq!(s.subject_name, "Computer Applications");
    }

    #[test]
    fn test_student_row_separate_columns() {
        let r = row(&[
            ("Name", "Grace Hopper"),
            ("Roll", " 007 "),
            ("Subject Code", "mth"),
        ]);
        let s = RowNormalizer::new().normalize_student_row(&r);
        assert_eq!(s.register_number, "007");
        assert_eq!(s.student_name, "Grace Hopper");
        assert_eq!(s.subject_code, "MTH");
        assert_eq!(s.subject_name, "");
    }

    #[test]
    fn test_student_row_course_without_parenthetical_is_code() {
        let r = row(&[("Name", "Grace"), ("Programme", "BCA")]);
        let s = RowNormalizer::new().normalize_student_row(&r);
        assert_eq!(s.subject_code, "BCA");
        assert_eq!(s.subject_name, "");
    }

    #[test]
    fn test_subject_fallback_scan() {
        // No subject-ish header at all; the scan must skip the "name" column
        // and the long cell, then pick the first short alphanumeric value.
        let r = row(&[
            ("Full Name", "Ada"),
            ("Remarks", "needs front row seating"),
            ("Batch", "cs101"),
        ]);
        let s = RowNormalizer::new().normalize_student_row(&r);
        assert_eq!(s.subject_code, "CS101");
    }

    #[test]
    fn test_subject_fallback_empty_when_nothing_plausible() {
        let r = row(&[("Full Name", "Ada"), ("Remarks", "not a subject code!")]);
        let s = RowNormalizer::new().normalize_student_row(&r);
        assert_eq!(s.subject_code, "");
    }

    #[test]
    fn test_unidentifiable_row_degrades_to_empty_register() {
        let r = row(&[("???", "mystery")]);
        let s = RowNormalizer::new().normalize_student_row(&r);
        assert_eq!(s.register_number, "");
    }

    #[test]
    fn test_hall_row_full() {
        let r = row(&[
            ("Hall", " H-101 "),
            ("Benches", "42"),
            ("Rows", "6"),
            ("Cols", "7"),
        ]);
        let h = RowNormalizer::new().normalize_hall_row(&r, 0);
        assert_eq!(
            h,
            HallRecord {
                hall_id: "H-101".to_owned(),
                benches: 42,
                rows: Some(6),
                cols: Some(7),
            }
        );
    }

    #[test]
    fn test_hall_row_defaults() {
        let r = row(&[("Seats", "not-a-number")]);
        let h = RowNormalizer::new().normalize_hall_row(&r, 4);
        assert_eq!(h.hall_id, "Hall_5");
        assert_eq!(h.benches, DEFAULT_BENCHES);
        assert_eq!(h.rows, None);
        assert_eq!(h.cols, None);
    }

    #[test]
    fn test_hall_row_configurable_default_benches() {
        let r = row(&[("Room", "R2")]);
        let h = RowNormalizer::new()
            .default_benches(25)
            .normalize_hall_row(&r, 0);
        assert_eq!(h.benches, 25);
    }

    #[test]
    fn test_hall_row_zero_benches_is_invalid() {
        let r = row(&[("Capacity", "0")]);
        let h = RowNormalizer::new().normalize_hall_row(&r, 0);
        assert_eq!(h.benches, DEFAULT_BENCHES);
    }

    #[test]
    fn test_parse_positive_tolerates_spreadsheet_floats() {
        assert_eq!(parse_positive(" 30.0 "), Some(30));
        assert_eq!(parse_positive("30"), Some(30));
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive("x"), None);
    }

    #[test]
    fn test_normalize_hall_rows_indexes_default_ids() {
        let rows = vec![row(&[("Capacity", "10")]), row(&[("Capacity", "12")])];
        let halls = RowNormalizer::new().normalize_hall_rows(&rows);
        assert_eq!(halls[0].hall_id, "Hall_1");
        assert_eq!(halls[1].hall_id, "Hall_2");
    }
}
