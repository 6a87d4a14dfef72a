//! Mock LLM adapter for running without API calls.
//!
//! Serves scripted replies in order. With an empty script it synthesizes a
//! placeholder answer from the requested output schema, so the whole app can
//! be driven offline.

use crate::domain::DomainError;
use crate::ports::{GenerationRequest, LlmPort};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

type Responder = Box<dyn Fn(&str) -> String + Send + Sync>;

/// One scripted turn.
pub enum MockReply {
    /// Answer with this text.
    Text(String),
    /// Call `tool` with `arguments`, then answer with `respond(tool_output)`.
    CallTool {
        tool: String,
        arguments: Value,
        respond: Responder,
    },
    /// Fail like an unreachable model API.
    Fail(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        MockReply::Fail(message.into())
    }

    pub fn call_tool(
        tool: impl Into<String>,
        arguments: Value,
        respond: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        MockReply::CallTool {
            tool: tool.into(),
            arguments,
            respond: Box::new(respond),
        }
    }
}

/// What the mock saw for one `generate` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt_name: &'static str,
    pub instruction: String,
    pub tool_names: Vec<String>,
    pub tool_outputs: Vec<String>,
}

pub struct MockLlmAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
    script: Mutex<VecDeque<MockReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlmAdapter {
    /// Schema-driven placeholder answers with a 100ms simulated delay.
    pub fn new() -> Self {
        Self::with_delay(100)
    }

    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// No delay; replies served in the given order.
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        let mock = Self::with_delay(0);
        for reply in replies {
            mock.push_reply(reply);
        }
        mock
    }

    pub fn push_reply(&self, reply: MockReply) {
        lock(&self.script).push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn next_reply(&self) -> Option<MockReply> {
        lock(&self.script).pop_front()
    }
}

impl Default for MockLlmAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl LlmPort for MockLlmAdapter {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, DomainError> {
        info!(
            prompt = request.prompt_name,
            instruction_len = request.instruction.len(),
            "[MOCK] Simulating model call"
        );

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        let mut record = RecordedCall {
            prompt_name: request.prompt_name,
            instruction: request.instruction.clone(),
            tool_names: request.tools.iter().map(|t| t.name().to_string()).collect(),
            tool_outputs: Vec::new(),
        };

        let result = match self.next_reply() {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(message)) => Err(DomainError::Llm(message)),
            Some(MockReply::CallTool {
                tool,
                arguments,
                respond,
            }) => match request.tools.iter().find(|t| t.name() == tool) {
                Some(bound) => {
                    let output = bound.call(arguments).await;
                    let answer = respond(&output);
                    record.tool_outputs.push(output);
                    Ok(answer)
                }
                None => Err(DomainError::Llm(format!("[MOCK] tool '{tool}' is not bound"))),
            },
            None => {
                let answer = placeholder("result", &request.output_schema, &request.instruction);
                Ok(answer.to_string())
            }
        };

        lock(&self.calls).push(record);
        result
    }
}

/// Deterministic stand-in value for a JSON schema node. Free-form maps are
/// keyed by the ids on the instruction's `Platforms:` line.
fn placeholder(field: &str, schema: &Value, instruction: &str) -> Value {
    let uri_format = schema.get("format").and_then(Value::as_str) == Some("uri");
    if uri_format || (schema_type(schema) == "string" && field.ends_with("Url")) {
        return Value::String(format!("https://example.com/mock/{field}"));
    }

    match schema_type(schema) {
        "string" => Value::String(format!("[MOCK] {field}")),
        "integer" | "number" => Value::from(0),
        "boolean" => Value::Bool(false),
        "array" => {
            let items = schema.get("items").cloned().unwrap_or(Value::Null);
            Value::Array(vec![placeholder(field, &items, instruction)])
        }
        "object" => {
            let mut out = Map::new();
            match schema.get("properties").and_then(Value::as_object) {
                Some(props) => {
                    for (name, prop) in props {
                        out.insert(name.clone(), placeholder(name, prop, instruction));
                    }
                }
                None => {
                    let values = schema
                        .get("additionalProperties")
                        .cloned()
                        .unwrap_or(Value::Null);
                    let keys = requested_platforms(instruction);
                    if keys.is_empty() {
                        out.insert("mock".to_string(), placeholder("post", &values, instruction));
                    }
                    for key in keys {
                        let value = placeholder(&format!("{key} post"), &values, instruction);
                        out.insert(key.to_string(), value);
                    }
                }
            }
            Value::Object(out)
        }
        _ => Value::Null,
    }
}

fn requested_platforms(instruction: &str) -> Vec<&str> {
    instruction
        .lines()
        .find_map(|line| line.strip_prefix("Platforms:"))
        .map(|ids| {
            ids.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// `type` may be a string or a list like `["string", "null"]`.
fn schema_type(schema: &Value) -> &str {
    match schema.get("type") {
        Some(Value::String(t)) => t.as_str(),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")
            .unwrap_or("null"),
        _ if schema.get("properties").is_some() => "object",
        _ => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventDetails, HashtagSuggestions, Platform, RecapResult, SocialPostSet};
    use crate::usecases::generator::output_schema;

    fn request_for(schema: Value) -> GenerationRequest {
        GenerationRequest {
            prompt_name: "mockTest",
            instruction: "Do the thing".into(),
            output_schema: schema,
            tools: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_placeholder_answers_parse_into_output_types() {
        let mock = MockLlmAdapter::with_delay(0);

        let raw = mock
            .generate(&request_for(output_schema::<RecapResult>()))
            .await
            .unwrap();
        let recap: RecapResult = serde_json::from_str(&raw).unwrap();
        assert_eq!(recap.recap_post, "[MOCK] recapPost");

        let raw = mock
            .generate(&request_for(output_schema::<EventDetails>()))
            .await
            .unwrap();
        let details: EventDetails = serde_json::from_str(&raw).unwrap();
        assert_eq!(details.title.as_deref(), Some("[MOCK] title"));
        assert!(details.image_url.is_some());

        let raw = mock
            .generate(&request_for(output_schema::<SocialPostSet>()))
            .await
            .unwrap();
        let posts: SocialPostSet = serde_json::from_str(&raw).unwrap();
        assert_eq!(posts.len(), 1);

        let raw = mock
            .generate(&request_for(output_schema::<HashtagSuggestions>()))
            .await
            .unwrap();
        let tags: HashtagSuggestions = serde_json::from_str(&raw).unwrap();
        assert_eq!(tags.hashtags.len(), 1);

        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_placeholder_posts_keyed_by_requested_platforms() {
        let mock = MockLlmAdapter::with_delay(0);
        let mut request = request_for(output_schema::<SocialPostSet>());
        request.instruction = "Tone: casual\nPlatforms: linkedin, x, threads\nHashtags: \n".into();

        let raw = mock.generate(&request).await.unwrap();
        let posts: SocialPostSet = serde_json::from_str(&raw).unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts.get(Platform::Linkedin), Some("[MOCK] linkedin post"));
        assert_eq!(posts.get(Platform::X), Some("[MOCK] x post"));
        assert!(posts
            .missing_platforms(&[Platform::Linkedin, Platform::X, Platform::Threads])
            .is_empty());
    }

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let mock = MockLlmAdapter::scripted(vec![MockReply::text("one"), MockReply::fail("down")]);
        let req = request_for(Value::Null);

        assert_eq!(mock.generate(&req).await.unwrap(), "one");
        assert!(matches!(
            mock.generate(&req).await,
            Err(DomainError::Llm(m)) if m == "down"
        ));
        assert_eq!(mock.calls()[0].instruction, "Do the thing");
    }

    #[tokio::test]
    async fn test_unbound_tool_fails() {
        let mock = MockLlmAdapter::scripted(vec![MockReply::call_tool(
            "fetchUrlContent",
            serde_json::json!({"url": "https://example.com"}),
            |out| out.to_string(),
        )]);
        let err = mock.generate(&request_for(Value::Null)).await.unwrap_err();
        assert!(err.to_string().contains("not bound"));
    }
}
