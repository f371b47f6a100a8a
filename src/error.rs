// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Why a single CSV row could not be turned into a metadata document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Fewer fields than the table layout requires
    #[error("malformed row: expected {expected} fields, found {found}")]
    MalformedRow { expected: usize, found: usize },

    /// First character of the unique code is not a known taxon prefix
    #[error("unmapped taxon code `{code}` (expected a, b, m or r prefix)")]
    UnmappedTaxon { code: String },

    /// Unique code cannot be used as an output file name stem
    #[error("invalid unique code `{code}`")]
    InvalidUniqueCode { code: String },

    /// Publication date does not start with a four digit year
    #[error("invalid publication date `{value}`")]
    InvalidPublicationDate { value: String },

    /// Editor list has a number of distinct names we cannot phrase
    #[error("unsupported editor count {count} (supported: 1 to 4)")]
    UnsupportedEditorCount { count: usize },

    /// A field the row needs is not valid UTF-8
    #[error("field `{column}` is not valid UTF-8")]
    InvalidEncoding { column: String },

    #[error("malformed editor list `{value}`: {reason}")]
    MalformedEditorList { value: String, reason: String },
}

/// A `FieldError` located in its source file.
#[derive(Debug, Error)]
#[error("{}, row {row}: {kind}", .file.display())]
pub struct RowError {
    pub file: PathBuf,
    pub row: usize,
    #[source]
    pub kind: FieldError,
}

impl RowError {
    pub fn new(file: impl Into<PathBuf>, row: usize, kind: FieldError) -> Self {
        Self {
            file: file.into(),
            row,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_error_names_file_and_row() {
        let err = RowError::new(
            "rng.csv",
            7,
            FieldError::MalformedRow {
                expected: 11,
                found: 4,
            },
        );
        assert_eq!(
            err.to_string(),
            "rng.csv, row 7: malformed row: expected 11 fields, found 4"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
