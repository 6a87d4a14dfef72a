//! Extraction pipeline: event page URL in, structured event details out.
//!
//! The model gets the page through the fetch tool and decides itself when to
//! call it. The only post-processing is the registration link fallback.

use crate::domain::{DomainError, EventDetails, ExtractEventDetailsRequest};
use crate::ports::{LlmPort, ToolPort};
use crate::usecases::generator::StructuredPrompt;
use std::sync::Arc;
use tracing::{info, warn};

pub const EXTRACT_EVENT_DETAILS_PROMPT: &str = r#"You are an expert at extracting structured event information from websites.
Your task is to analyze the content of the provided URL and extract the key details of the event.

Extract the following information:
- Event Title
- Event Description: a comprehensive summary.
- Date: in YYYY-MM-DD format.
- Time: the start time, in HH:MM format if possible.
- Location: the venue name and/or address, or "Virtual" if online.
- Image URL: a direct link to a featured image. Prioritize Open Graph (og:image) or similar meta tags.
- Registration URL: the URL to register for the event.

First, use the 'fetchUrlContent' tool with the provided URL: {{url}}
Then carefully analyze the fetched text to populate the output fields. If a piece of information is not available, leave the corresponding field empty.
The registration URL should be the most direct link to sign up or buy tickets. If none is found, the original event URL is a good fallback."#;

pub struct EventExtractionService {
    llm: Arc<dyn LlmPort>,
    prompt: StructuredPrompt<ExtractEventDetailsRequest, EventDetails>,
}

impl EventExtractionService {
    /// `fetch_tool` is offered to the model so it can read the page.
    pub fn new(llm: Arc<dyn LlmPort>, fetch_tool: Arc<dyn ToolPort>) -> Self {
        Self {
            llm,
            prompt: StructuredPrompt::new("extractEventDetailsPrompt", EXTRACT_EVENT_DETAILS_PROMPT)
                .with_tool(fetch_tool),
        }
    }

    pub async fn extract(
        &self,
        request: &ExtractEventDetailsRequest,
    ) -> Result<EventDetails, DomainError> {
        // The trimmed URL is the one the model sees and the fallback link.
        let request = ExtractEventDetailsRequest::new(request.url.trim());
        let mut details = match self.prompt.generate(self.llm.as_ref(), &request).await {
            Ok(details) => details,
            Err(DomainError::Generation { .. }) => {
                warn!(url = %request.url, "extraction produced no usable output");
                return Err(DomainError::Extraction);
            }
            Err(e) => return Err(e),
        };

        if details.registration_url.is_none() {
            details.registration_url = Some(request.url.clone());
        }

        info!(
            url = %request.url,
            title = details.title.as_deref().unwrap_or("-"),
            has_image = details.image_url.is_some(),
            "event details extracted"
        );
        Ok(details)
    }
}
