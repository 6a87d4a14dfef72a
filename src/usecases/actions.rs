//! Caller-facing actions.
//!
//! Each action runs one pipeline on its own task and folds every outcome,
//! panics included, into an [`ActionResult`]: data, or a short message with a
//! per-action prefix. Nothing here returns `Err`.

use crate::domain::{
    DomainError, EventDetails, ExtractEventDetailsRequest, HashtagRequest, HashtagSuggestions,
    RecapRequest, RecapResult, SocialPostRequest, SocialPostSet,
};
use crate::ports::{LlmPort, ToolPort};
use crate::usecases::{EventExtractionService, PromotionService, RecapService};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::error;

pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Serializes as `{"data": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionResult<T> {
    Data(T),
    Error(String),
}

impl<T> ActionResult<T> {
    pub fn into_result(self) -> Result<T, String> {
        match self {
            ActionResult::Data(data) => Ok(data),
            ActionResult::Error(message) => Err(message),
        }
    }
}

pub struct Actions {
    extraction: Arc<EventExtractionService>,
    promotion: Arc<PromotionService>,
    recap: Arc<RecapService>,
}

impl Actions {
    /// Wire all pipelines to one model. `fetch_tool` is bound to extraction.
    pub fn new(llm: Arc<dyn LlmPort>, fetch_tool: Arc<dyn ToolPort>) -> Self {
        Self {
            extraction: Arc::new(EventExtractionService::new(Arc::clone(&llm), fetch_tool)),
            promotion: Arc::new(PromotionService::new(Arc::clone(&llm))),
            recap: Arc::new(RecapService::new(llm)),
        }
    }

    pub async fn extract_event_details(
        &self,
        request: ExtractEventDetailsRequest,
    ) -> ActionResult<EventDetails> {
        let service = Arc::clone(&self.extraction);
        run_action(
            "extract_event_details",
            "Failed to extract event details: ",
            async move { service.extract(&request).await },
        )
        .await
    }

    pub async fn generate_social_posts(
        &self,
        request: SocialPostRequest,
    ) -> ActionResult<SocialPostSet> {
        let service = Arc::clone(&self.promotion);
        run_action(
            "generate_social_posts",
            "Failed to generate posts: ",
            async move { service.generate_posts(&request).await },
        )
        .await
    }

    pub async fn generate_recap_post(&self, request: RecapRequest) -> ActionResult<RecapResult> {
        let service = Arc::clone(&self.recap);
        run_action(
            "generate_recap_post",
            "Failed to generate recap: ",
            async move { service.generate_recap(&request).await },
        )
        .await
    }

    pub async fn suggest_hashtags(
        &self,
        request: HashtagRequest,
    ) -> ActionResult<HashtagSuggestions> {
        let service = Arc::clone(&self.promotion);
        run_action(
            "suggest_hashtags",
            "Failed to suggest hashtags: ",
            async move { service.suggest_hashtags(&request).await },
        )
        .await
    }
}

async fn run_action<T, F>(action: &'static str, prefix: &str, pipeline: F) -> ActionResult<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T, DomainError>> + Send + 'static,
{
    match tokio::spawn(pipeline).await {
        Ok(Ok(data)) => ActionResult::Data(data),
        Ok(Err(e)) => {
            error!(action, error = %e, detail = ?e, "action failed");
            ActionResult::Error(format!("{prefix}{e}"))
        }
        Err(e) => {
            error!(action, error = %e, panicked = e.is_panic(), "action task died");
            ActionResult::Error(format!("{prefix}{UNKNOWN_ERROR}"))
        }
    }
}
