//! `fetchUrlContent` tool. Lets the model read an event page on demand.

use crate::domain::validation::parse_page_url;
use crate::ports::{ContentFetcherPort, ToolPort};
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

pub const FETCH_URL_TOOL_NAME: &str = "fetchUrlContent";

#[derive(Debug, Deserialize, JsonSchema)]
struct FetchUrlArgs {
    /// The public URL of the event page to fetch.
    url: String,
}

pub struct FetchUrlContentTool {
    fetcher: Arc<dyn ContentFetcherPort>,
}

impl FetchUrlContentTool {
    pub fn new(fetcher: Arc<dyn ContentFetcherPort>) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl ToolPort for FetchUrlContentTool {
    fn name(&self) -> &str {
        FETCH_URL_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Fetches the text content of a given public URL. Useful for extracting information from event pages."
    }

    fn parameters(&self) -> serde_json::Value {
        let mut schema = serde_json::to_value(schema_for!(FetchUrlArgs)).unwrap_or_default();
        if let serde_json::Value::Object(map) = &mut schema {
            map.remove("$schema");
            map.remove("title");
        }
        schema
    }

    async fn call(&self, arguments: serde_json::Value) -> String {
        let args: FetchUrlArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!(error = %e, "bad fetchUrlContent arguments");
                return format!("Error: invalid arguments ({e}). Expected {{\"url\": \"https://...\"}}.");
            }
        };
        let url = match parse_page_url(&args.url) {
            Ok(url) => url,
            Err(e) => return format!("Error: {e}"),
        };

        info!(url = %url, "model requested page content");
        self.fetcher.fetch_page(&url).await.to_prompt_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageContent;
    use url::Url;

    struct FixedFetcher(PageContent);

    #[async_trait::async_trait]
    impl ContentFetcherPort for FixedFetcher {
        async fn fetch_page(&self, _url: &Url) -> PageContent {
            self.0.clone()
        }
    }

    fn tool(page: PageContent) -> FetchUrlContentTool {
        FetchUrlContentTool::new(Arc::new(FixedFetcher(page)))
    }

    #[tokio::test]
    async fn test_call_returns_page_text() {
        let t = tool(PageContent {
            text: "Tech Meetup, March 3 2025, 6pm, Virtual".into(),
            metadata: vec![],
        });
        let out = t
            .call(serde_json::json!({"url": "https://example.com/event"}))
            .await;
        assert_eq!(out, "Tech Meetup, March 3 2025, 6pm, Virtual");
    }

    #[tokio::test]
    async fn test_output_capped_with_large_head_and_body() {
        let html = format!(
            r#"<html><head><meta property="og:description" content="{}"></head><body><p>{}</p></body></html>"#,
            "d".repeat(3_000),
            "word ".repeat(5_000)
        );
        let base = Url::parse("https://example.com/event").unwrap();
        let t = tool(crate::adapters::web::http_fetcher::extract_page(&html, &base));

        let out = t
            .call(serde_json::json!({"url": "https://example.com/event"}))
            .await;
        assert_eq!(out.chars().count(), crate::domain::MAX_CONTENT_CHARS);
        assert!(out.starts_with("Page metadata:\nog:description: "));
    }

    #[tokio::test]
    async fn test_bad_arguments_are_reported_as_text() {
        let t = tool(PageContent::default());
        assert!(t.call(serde_json::json!({"link": "x"})).await.starts_with("Error:"));
        assert!(t
            .call(serde_json::json!({"url": "mailto:someone@example.com"}))
            .await
            .starts_with("Error: url:"));
    }

    #[test]
    fn test_parameters_schema_requires_url() {
        let schema = tool(PageContent::default()).parameters();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], serde_json::json!(["url"]));
        assert!(schema.get("$schema").is_none());
    }
}
