//! LLM interpretation error types

use thiserror::Error;

use super::WellError;

/// Errors from the LLM-backed interpretation layer
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key configured for the completion provider
    #[error("GROQ_API_KEY is not set; add it to the environment to use AI interpretation")]
    MissingApiKey,

    /// Transport failure talking to the completion endpoint
    #[error("Completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("Completion provider returned status {0}")]
    Provider(u16),

    /// Underlying statistics lookup failed
    #[error(transparent)]
    Well(#[from] WellError),
}

impl LlmError {
    pub fn error_code(&self) -> &'static str {
        match self {
            LlmError::MissingApiKey => "NOT_CONFIGURED",
            LlmError::Http(_) | LlmError::Provider(_) => "COMPLETION_FAILED",
            LlmError::Well(e) => e.error_code(),
        }
    }
}
