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

//! Persisted record sets.
//!
//! An upload step normalizes raw rows once and persists the canonical result
//! as JSON; a later allocation step resumes from that record set instead of
//! re-parsing the source files. The JSON shapes here are also what the
//! optional external constraint-solver bridge consumes, so they change only
//! with care.
//!
//! A referenced record set that does not exist is a distinct, fatal error
//! ([`PersistError::Missing`]): the allocation request it belongs to cannot
//! proceed and no partial result is produced.

use crate::record::{HallRecord, Student};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

/// The error type for record-set persistence.
#[derive(Debug)]
pub enum PersistError {
    /// The referenced record set does not exist.
    Missing(PathBuf),
    /// An I/O error occurred while reading or writing.
    Io(std::io::Error),
    /// The stored JSON could not be (de)serialized.
    Json(serde_json::Error),
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(path) => {
                write!(f, "referenced record set '{}' does not exist", path.display())
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Missing(_) => None,
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// A persisted, already-normalized student and hall record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecordSet {
    /// Canonical student records, as produced by normalization.
    #[serde(default)]
    pub students: Vec<Student>,
    /// Hall records, possibly with unresolved grid dimensions.
    #[serde(default)]
    pub halls: Vec<HallRecord>,
}

impl RecordSet {
    /// Creates an empty record set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a record set from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Missing`] if the path does not exist; this is
    /// fatal for the allocation request referencing the set.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PersistError::Missing(path.to_path_buf())
            } else {
                PersistError::Io(e)
            }
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Loads a record set from a generic reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PersistError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads a record set from a JSON string slice.
    pub fn from_str(s: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Writes the record set as JSON to a generic writer.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), PersistError> {
        Ok(serde_json::to_writer(writer, self)?)
    }

    /// Writes the record set as JSON to a file path, replacing any existing
    /// file.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Serializes the record set to a JSON string.
    pub fn to_json_string(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }
}
