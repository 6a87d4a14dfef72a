//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, PageContent, RecapResult, SocialPostSet};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// One structured generation: an instruction, the JSON schema the answer must
/// match, and the tools the model may call while producing it.
#[derive(Clone)]
pub struct GenerationRequest {
    /// Stable prompt identifier (also used as the schema name on the wire).
    pub prompt_name: &'static str,
    /// Instruction text with all placeholders already filled in.
    pub instruction: String,
    pub output_schema: serde_json::Value,
    pub tools: Vec<Arc<dyn ToolPort>>,
}

impl std::fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("prompt_name", &self.prompt_name)
            .field("instruction_len", &self.instruction.len())
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Language model port.
#[async_trait::async_trait]
pub trait LlmPort: Send + Sync {
    /// Run one generation and return the raw text of the final answer.
    ///
    /// Tool round trips requested by the model happen inside this call.
    /// Parsing the text against the schema is the caller's job.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, DomainError>;
}

/// A function the model may call mid-generation.
#[async_trait::async_trait]
pub trait ToolPort: Send + Sync {
    /// Name the model uses to call the tool.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn parameters(&self) -> serde_json::Value;

    /// Execute with the model-supplied arguments. Failures are reported to the
    /// model as text, never as an error.
    async fn call(&self, arguments: serde_json::Value) -> String;
}

/// Page fetcher port. Never fails: unreadable pages come back as
/// [`PageContent::unavailable`].
#[async_trait::async_trait]
pub trait ContentFetcherPort: Send + Sync {
    async fn fetch_page(&self, url: &Url) -> PageContent;
}

/// Writes generated posts somewhere the user can pick them up.
#[async_trait::async_trait]
pub trait PostExportPort: Send + Sync {
    /// Returns the path of the written file.
    async fn export_posts(
        &self,
        event_title: &str,
        posts: &SocialPostSet,
    ) -> Result<PathBuf, DomainError>;

    async fn export_recap(&self, recap: &RecapResult) -> Result<PathBuf, DomainError>;
}
