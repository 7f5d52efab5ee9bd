//! Domain-specific error types for welllog
//!
//! Structured error types for the domains of the crate:
//!
//! - **LasError**: LAS document parsing (user-correctable input errors)
//! - **BlobError**: blob store access
//! - **IngestError**: file upload/processing orchestration
//! - **WellError**: well-scoped read operations
//! - **LlmError**: LLM interpretation configuration and transport
//!
//! Parse and validation errors carry enough detail to fix the offending
//! input. Store-layer errors are wrapped opaquely; callers see an error
//! code, the full detail goes to the server-side log.

pub mod blob;
pub mod ingest;
pub mod las;
pub mod llm;
pub mod well;

pub use blob::BlobError;
pub use ingest::IngestError;
pub use las::LasError;
pub use llm::LlmError;
pub use well::WellError;

/// Result type alias for LAS parsing
pub type LasResult<T> = Result<T, LasError>;

/// Result type alias for blob store operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Result type alias for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;

/// Result type alias for well read operations
pub type WellResult<T> = Result<T, WellError>;

/// Result type alias for LLM interpretation
pub type LlmResult<T> = Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_las_result_alias() {
        let result: LasResult<()> = Err(LasError::MissingSection("C"));
        assert!(result.is_err());
    }

    #[test]
    fn test_ingest_result_alias() {
        let result: IngestResult<i32> = Err(IngestError::FileNotFound(7));
        assert!(result.is_err());
    }

    #[test]
    fn test_well_result_alias() {
        let result: WellResult<()> = Err(WellError::NotFound(1));
        assert!(result.is_err());
    }
}
