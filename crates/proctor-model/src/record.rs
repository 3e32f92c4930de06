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

//! Canonical student and hall records.
//!
//! These are the records every pipeline stage after normalization agrees on.
//! A [`Student`] carries a canonical register number (whitespace-stripped,
//! uppercase) and a canonical subject code (trimmed, uppercase); a
//! [`HallRecord`] carries a bench count plus whatever partial grid information
//! the source provided. Grid resolution is handled by [`crate::geometry`].
//!
//! Canonicalization is idempotent: applying [`canonical_register`] or
//! [`canonical_subject`] to an already-canonical value is a no-op. The roster
//! reconciler relies on this when re-processing persisted record sets.

use serde::{Deserialize, Serialize};

/// A single examinee, fully normalized.
///
/// Invariants after reconciliation (see [`crate::roster`]):
/// * `register_number` is non-empty and unique within its roster.
/// * `register_number` and `subject_code` are canonical.
///
/// The normalizer may produce records with an empty `register_number`; the
/// reconciler synthesizes one before any downstream consumer sees the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// The canonical unique identifier of the student.
    pub register_number: String,
    /// The student's display name, trimmed.
    pub student_name: String,
    /// The canonical subject code used for seat interleaving.
    pub subject_code: String,
    /// The human-readable subject or course name, if the source carried one.
    #[serde(default)]
    pub subject_name: String,
}

/// A hall as parsed from source data, before grid resolution.
///
/// `rows` and `cols` stay `None` when the source did not provide them; the
/// geometry resolver derives the missing dimension(s) and upholds
/// `rows * cols >= benches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallRecord {
    /// Unique hall identifier.
    pub hall_id: String,
    /// Number of seats in the hall. Always positive after normalization.
    pub benches: u32,
    /// Number of grid rows, when the source provided one.
    #[serde(default)]
    pub rows: Option<u32>,
    /// Number of grid columns, when the source provided one.
    #[serde(default)]
    pub cols: Option<u32>,
}

impl HallRecord {
    /// Creates a hall record with no grid information.
    #[inline]
    pub fn new(hall_id: impl Into<String>, benches: u32) -> Self {
        Self {
            hall_id: hall_id.into(),
            benches,
            rows: None,
            cols: None,
        }
    }
}

/// Canonicalizes a register number: strips *all* whitespace and uppercases.
///
/// Idempotent by construction.
///
/// # Examples
///
/// ```rust
/// use proctor_model::record::canonical_register;
///
/// assert_eq!(canonical_register("  21 bca 042 "), "21BCA042");
/// assert_eq!(canonical_register("21BCA042"), "21BCA042");
/// ```
pub fn canonical_register(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Canonicalizes a subject code: trims surrounding whitespace and uppercases.
///
/// Interior whitespace is preserved; subject codes are matched verbatim after
/// this transformation, so "CS 101" and "CS101" remain distinct subjects.
pub fn canonical_subject(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_register_strips_and_uppercases() {
        assert_eq!(canonical_register(" 21 bca\t042\n"), "21BCA042");
        assert_eq!(canonical_register(""), "");
    }

    #[test]
    fn test_canonical_register_is_idempotent() {
        let once = canonical_register("ab 12 cd");
        assert_eq!(canonical_register(&once), once);
    }

    #[test]
    fn test_canonical_subject_preserves_interior_whitespace() {
        assert_eq!(canonical_subject("  cs 101 "), "CS 101");
        assert_eq!(canonical_subject("CS 101"), "CS 101");
    }

    #[test]
    fn test_student_serde_defaults_subject_name() {
        let json = r#"{"register_number":"R1","student_name":"Ada","subject_code":"CS"}"#;
        let s: Student = serde_json::from_str(json).unwrap();
        assert_eq!(s.subject_name, "");
    }

    #[test]
    fn test_hall_record_serde_defaults_dimensions() {
        let json = r#"{"hall_id":"Hall_1","benches":30}"#;
        let h: HallRecord = serde_json::from_str(json).unwrap();
        assert_eq!(h, HallRecord::new("Hall_1", 30));
    }
}
