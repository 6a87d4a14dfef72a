//! Schema-constrained generation.
//!
//! A [`StructuredPrompt`] pairs an instruction template with a typed input and
//! a typed output. Generating validates the input, fills the template, makes
//! exactly one model invocation and parses the answer into the output type.
//! There is no retry here; callers decide what to do with a failure.

use crate::domain::{DomainError, Validate};
use crate::ports::{GenerationRequest, LlmPort, ToolPort};
use crate::usecases::template::PromptTemplate;
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StructuredPrompt<I, O> {
    name: &'static str,
    template: PromptTemplate,
    tools: Vec<Arc<dyn ToolPort>>,
    _io: PhantomData<fn(&I) -> O>,
}

impl<I, O> StructuredPrompt<I, O>
where
    I: Serialize + Validate + Sync,
    O: DeserializeOwned + JsonSchema,
{
    pub fn new(name: &'static str, template: &'static str) -> Self {
        Self {
            name,
            template: PromptTemplate::new(template),
            tools: Vec::new(),
            _io: PhantomData,
        }
    }

    /// Make `tool` available to the model for this prompt.
    pub fn with_tool(mut self, tool: Arc<dyn ToolPort>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Validate `input` and build the request the model will see.
    pub fn build_request(&self, input: &I) -> Result<GenerationRequest, DomainError> {
        input.validate()?;
        let fields = serde_json::to_value(input)
            .map_err(|e| DomainError::Validation(format!("Unserializable input: {e}")))?;

        Ok(GenerationRequest {
            prompt_name: self.name,
            instruction: self.template.render(&fields),
            output_schema: output_schema::<O>(),
            tools: self.tools.clone(),
        })
    }

    pub async fn generate(&self, llm: &dyn LlmPort, input: &I) -> Result<O, DomainError> {
        let request = self.build_request(input)?;
        info!(
            prompt = self.name,
            instruction_len = request.instruction.len(),
            tools = request.tools.len(),
            "invoking model"
        );

        let raw = llm.generate(&request).await?;
        debug!(prompt = self.name, raw_len = raw.len(), "model answered");

        parse_output(self.name, &raw)
    }
}

/// JSON schema for `O`, without the `$schema` marker the model APIs reject.
pub fn output_schema<O: JsonSchema>() -> serde_json::Value {
    let mut value = serde_json::to_value(schema_for!(O)).unwrap_or_default();
    if let serde_json::Value::Object(map) = &mut value {
        map.remove("$schema");
    }
    value
}

/// Parse a raw model answer into `O`. Empty, `null` or mis-shaped answers
/// are all [`DomainError::Generation`].
pub fn parse_output<O: DeserializeOwned>(prompt: &'static str, raw: &str) -> Result<O, DomainError> {
    let clean = sanitize_json(raw);
    if clean.is_empty() {
        warn!(prompt, "model returned an empty answer");
        return Err(DomainError::Generation { prompt });
    }

    let value: serde_json::Value = serde_json::from_str(&clean).map_err(|e| {
        warn!(prompt, error = %e, json = %clean.chars().take(200).collect::<String>(), "JSON parse failed");
        DomainError::Generation { prompt }
    })?;
    if value.is_null() {
        warn!(prompt, "model returned null");
        return Err(DomainError::Generation { prompt });
    }

    serde_json::from_value(value).map_err(|e| {
        warn!(prompt, error = %e, "answer does not match the output schema");
        DomainError::Generation { prompt }
    })
}

/// Sanitize JSON answer from an LLM.
///
/// Models sometimes wrap JSON in markdown code blocks or add a sentence in
/// front of it. This strips both.
pub fn sanitize_json(raw_text: &str) -> String {
    let trimmed = raw_text.trim();

    // ```json ... ``` or ``` ... ```
    if trimmed.starts_with("```") {
        let without_prefix = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .unwrap_or(trimmed);

        if let Some(end_idx) = without_prefix.rfind("```") {
            return without_prefix[..end_idx].trim().to_string();
        }
        return without_prefix.trim().to_string();
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockLlmAdapter, MockReply};
    use crate::domain::{RecapRequest, RecapResult};

    const RECAP: &str = "Recap this: {{eventDescription}}";

    fn recap_prompt() -> StructuredPrompt<RecapRequest, RecapResult> {
        StructuredPrompt::new("recapTest", RECAP)
    }

    fn recap_request() -> RecapRequest {
        RecapRequest {
            event_description: "Forty people came and we shipped three demos.".into(),
        }
    }

    #[test]
    fn test_sanitize_json_clean() {
        let input = r#"{"recapPost": "test"}"#;
        assert_eq!(sanitize_json(input), input);
    }

    #[test]
    fn test_sanitize_json_markdown() {
        let input = "```json\n{\"recapPost\": \"test\"}\n```";
        assert_eq!(sanitize_json(input), r#"{"recapPost": "test"}"#);
    }

    #[test]
    fn test_sanitize_json_markdown_no_lang() {
        let input = "```\n{\"recapPost\": \"test\"}\n```";
        assert_eq!(sanitize_json(input), r#"{"recapPost": "test"}"#);
    }

    #[test]
    fn test_sanitize_json_with_text() {
        let input = "Here is your recap:\n{\"recapPost\": \"test\"}";
        assert_eq!(sanitize_json(input), r#"{"recapPost": "test"}"#);
    }

    #[test]
    fn test_parse_output_rejects_empty_null_and_wrong_shape() {
        for raw in ["", "   ", "null", r#"{"somethingElse": 1}"#, "not json at all"] {
            let err = parse_output::<RecapResult>("recapTest", raw).unwrap_err();
            assert!(
                matches!(err, DomainError::Generation { prompt: "recapTest" }),
                "raw = {raw:?}"
            );
        }
    }

    #[test]
    fn test_output_schema_has_no_schema_marker() {
        let schema = output_schema::<RecapResult>();
        assert!(schema.get("$schema").is_none());
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"].get("recapPost").is_some());
    }

    #[test]
    fn test_build_request_fills_template() {
        let request = recap_prompt().build_request(&recap_request()).unwrap();
        assert_eq!(request.prompt_name, "recapTest");
        assert_eq!(
            request.instruction,
            "Recap this: Forty people came and we shipped three demos."
        );
        assert!(request.tools.is_empty());
    }

    #[tokio::test]
    async fn test_generate_invokes_model_once() {
        let llm = MockLlmAdapter::scripted(vec![MockReply::text(
            r#"{"recapPost": "What a night!"}"#,
        )]);
        let out = recap_prompt()
            .generate(&llm, &recap_request())
            .await
            .unwrap();

        assert_eq!(out.recap_post, "What a night!");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_model() {
        let llm = MockLlmAdapter::scripted(vec![]);
        let err = recap_prompt()
            .generate(
                &llm,
                &RecapRequest {
                    event_description: "too short".into(),
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_is_not_retried() {
        let llm = MockLlmAdapter::scripted(vec![
            MockReply::fail("503 from upstream"),
            MockReply::text(r#"{"recapPost": "unused"}"#),
        ]);
        let err = recap_prompt()
            .generate(&llm, &recap_request())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Llm(_)));
        assert_eq!(llm.call_count(), 1);
    }
}
