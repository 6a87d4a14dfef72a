//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. Network failures while
//! fetching a page never show up here: the fetcher absorbs them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Input rejected before any network or model call.
    #[error("{0}")]
    Validation(String),

    /// Model answered with nothing usable for `prompt`. The prompt id and
    /// the detail go to the log only.
    #[error("The model returned no usable output.")]
    Generation { prompt: &'static str },

    #[error("Could not extract event details.")]
    Extraction,

    /// Model API unreachable, non-2xx, or undecodable envelope.
    #[error("Model request failed: {0}")]
    Llm(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Prompt aborted: {0}")]
    Ui(String),
}

impl DomainError {
    pub fn validation(field: &str, message: &str) -> Self {
        DomainError::Validation(format!("{field}: {message}"))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}
