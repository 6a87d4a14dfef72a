//! Recap: turns a free-text account of a past event into a social post.

use crate::domain::{DomainError, RecapRequest, RecapResult};
use crate::ports::LlmPort;
use crate::usecases::generator::StructuredPrompt;
use std::sync::Arc;
use tracing::{info, warn};

pub const RECAP_PROMPT: &str = r#"You are an AI assistant that helps generate engaging and informative event recap posts.

Based on the event description provided below, create a compelling social media post summarizing the event and highlighting its key successes.

Event Description: {{eventDescription}}"#;

pub struct RecapService {
    llm: Arc<dyn LlmPort>,
    prompt: StructuredPrompt<RecapRequest, RecapResult>,
}

impl RecapService {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self {
            llm,
            prompt: StructuredPrompt::new("generateEventRecapPostPrompt", RECAP_PROMPT),
        }
    }

    pub async fn generate_recap(&self, request: &RecapRequest) -> Result<RecapResult, DomainError> {
        let recap = self.prompt.generate(self.llm.as_ref(), request).await?;
        // schema-valid but useless
        if recap.recap_post.trim().is_empty() {
            warn!("model returned a blank recap");
            return Err(DomainError::Generation {
                prompt: self.prompt.name(),
            });
        }

        info!(chars = recap.recap_post.chars().count(), "recap generated");
        Ok(recap)
    }
}
