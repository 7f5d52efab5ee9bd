//! Well read-path error types

use thiserror::Error;

/// Errors for well-scoped read operations (listing, ranges, statistics)
#[derive(Error, Debug)]
pub enum WellError {
    /// Well not found by ID
    #[error("Well {0} not found")]
    NotFound(i32),

    /// Relational store failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl WellError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, WellError::NotFound(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            WellError::NotFound(_) => "NOT_FOUND",
            WellError::Database(_) => "DATABASE_ERROR",
        }
    }
}
