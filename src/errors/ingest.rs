//! Ingestion error types
//!
//! Errors raised by the upload/process orchestration. Parse errors carry the
//! offending detail; store errors are surfaced opaquely and logged with full
//! detail server-side. There are no automatic retries in this layer.

use thiserror::Error;

use super::{BlobError, LasError};

/// File ingestion and processing errors
#[derive(Error, Debug)]
pub enum IngestError {
    /// File record not found by ID
    #[error("File {0} not found")]
    FileNotFound(i32),

    /// Well not found by ID
    #[error("Well {0} not found")]
    WellNotFound(i32),

    /// File has already been parsed into samples
    #[error("File {0} is already processed")]
    AlreadyProcessed(i32),

    /// The LAS document could not be parsed
    #[error("LAS parse error: {0}")]
    Parse(#[from] LasError),

    /// Blob store failure
    #[error("Blob store error: {0}")]
    Blob(#[from] BlobError),

    /// Relational store failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl IngestError {
    /// Client errors (bad input or bad request), 400-series equivalents
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IngestError::Parse(_) | IngestError::AlreadyProcessed(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            IngestError::FileNotFound(_) | IngestError::WellNotFound(_)
        ) || matches!(self, IngestError::Blob(b) if b.is_not_found())
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            IngestError::FileNotFound(_) | IngestError::WellNotFound(_) => "NOT_FOUND",
            IngestError::AlreadyProcessed(_) => "ALREADY_PROCESSED",
            IngestError::Parse(_) => "PARSE_ERROR",
            IngestError::Blob(_) => "BLOB_ERROR",
            IngestError::Database(_) => "DATABASE_ERROR",
        }
    }
}
