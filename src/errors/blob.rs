//! Blob store error types

use thiserror::Error;

/// Blob store operation errors
#[derive(Error, Debug)]
pub enum BlobError {
    /// No object stored under the given key
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// Key escapes the store namespace or is otherwise unusable
    #[error("Invalid blob key: {0}")]
    InvalidKey(String),

    /// Underlying IO failure
    #[error("Blob IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlobError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlobError::NotFound(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BlobError::NotFound(_) => "NOT_FOUND",
            BlobError::InvalidKey(_) => "INVALID_KEY",
            BlobError::Io(_) => "IO_ERROR",
        }
    }
}
