//! LAS parsing error types
//!
//! All variants are user-correctable input errors: they identify the
//! offending section or line so the document can be fixed and re-uploaded.

use thiserror::Error;

/// LAS document parsing errors
#[derive(Error, Debug)]
pub enum LasError {
    /// A required section marker (`~C`, `~A`) is missing
    #[error("Missing required LAS section: ~{0}")]
    MissingSection(&'static str),

    /// A curve definition line could not be parsed
    #[error("Malformed curve definition on line {line}: {content:?}")]
    MalformedCurveLine { line: usize, content: String },

    /// A data row has a different column count than the declared curves
    #[error("Data row on line {line} has {got} columns, expected {expected}")]
    RowWidth {
        line: usize,
        expected: usize,
        got: usize,
    },

    /// The document contains no section markers at all
    #[error("Not a LAS document: no section markers found")]
    NotLas,
}

impl LasError {
    /// All LAS errors are client errors: the input document is at fault.
    pub fn is_client_error(&self) -> bool {
        true
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            LasError::MissingSection(_) => "MISSING_SECTION",
            LasError::MalformedCurveLine { .. } => "MALFORMED_CURVE",
            LasError::RowWidth { .. } => "ROW_WIDTH_MISMATCH",
            LasError::NotLas => "NOT_LAS",
        }
    }
}
