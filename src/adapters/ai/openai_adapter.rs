//! OpenAI-compatible adapter for structured generation.
//!
//! Supports OpenAI API, Azure OpenAI, and local Ollama instances.
//! Sends the output schema as `response_format: json_schema` and runs the
//! tool-call round trips the model asks for inside a single `generate`.

use crate::domain::DomainError;
use crate::ports::{GenerationRequest, LlmPort, ToolPort};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 3;

/// OpenAI-compatible model adapter.
///
/// Can be configured to work with:
/// - OpenAI API (api.openai.com)
/// - Azure OpenAI
/// - Ollama (localhost)
/// - Any OpenAI-compatible API
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tool_rounds: usize,
}

impl OpenAiAdapter {
    /// Create a new OpenAI adapter.
    ///
    /// # Arguments
    /// * `api_url` - API endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - Model name (e.g., "gpt-4o-mini", "llama3.2")
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
            temperature: DEFAULT_TEMPERATURE,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Cap on tool-call round trips within one generation.
    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    fn build_body(&self, request: &GenerationRequest, messages: &[Value]) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            messages: messages.to_vec(),
            temperature: self.temperature,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: request.prompt_name,
                    schema: request.output_schema.clone(),
                    strict: false,
                },
            },
            tools: request.tools.iter().map(|t| tool_definition(t.as_ref())).collect(),
        }
    }

    async fn send(&self, body: &ChatRequest<'_>) -> Result<AssistantMessage, DomainError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::Llm(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "model API returned error");
            return Err(DomainError::Llm(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Llm(format!("Failed to parse API response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| DomainError::Llm("No response choices returned".to_string()))
    }
}

/// Tool definition in the chat-completions `tools` format.
fn tool_definition(tool: &dyn ToolPort) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name(),
            "description": tool.description(),
            "parameters": tool.parameters(),
        }
    })
}

async fn run_tool(tools: &[Arc<dyn ToolPort>], call: &ToolCall) -> String {
    let Some(tool) = tools.iter().find(|t| t.name() == call.function.name) else {
        warn!(tool = %call.function.name, "model requested unknown tool");
        return format!("Error: Unknown tool '{}'", call.function.name);
    };
    let arguments: Value = serde_json::from_str(&call.function.arguments).unwrap_or(Value::Null);
    tool.call(arguments).await
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
    temperature: f32,
    response_format: ResponseFormat<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: Value,
    strict: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

#[async_trait::async_trait]
impl LlmPort for OpenAiAdapter {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, DomainError> {
        info!(
            prompt = request.prompt_name,
            model = %self.model,
            tools = request.tools.len(),
            "sending generation request"
        );

        let mut messages = vec![json!({"role": "user", "content": request.instruction})];

        for round in 0..=self.max_tool_rounds {
            let body = self.build_body(request, &messages);
            let message = self.send(&body).await?;

            if message.tool_calls.is_empty() {
                let content = message.content.unwrap_or_default();
                info!(
                    prompt = request.prompt_name,
                    tool_rounds = round,
                    content_len = content.len(),
                    "generation complete"
                );
                return Ok(content);
            }

            if round == self.max_tool_rounds {
                break;
            }

            info!(
                prompt = request.prompt_name,
                round = round + 1,
                calls = message.tool_calls.len(),
                "model requested tool calls"
            );
            messages.push(json!({
                "role": "assistant",
                "content": message.content,
                "tool_calls": message.tool_calls,
            }));
            for call in &message.tool_calls {
                let output = run_tool(&request.tools, call).await;
                debug!(tool = %call.function.name, output_len = output.len(), "tool finished");
                messages.push(json!({
                    "role": "tool",
                    "tool_call_id": call.id,
                    "content": output,
                }));
            }
        }

        warn!(
            prompt = request.prompt_name,
            max_tool_rounds = self.max_tool_rounds,
            "model kept requesting tools"
        );
        Err(DomainError::Llm(format!(
            "model exceeded {} tool rounds",
            self.max_tool_rounds
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_server::{serve, CannedResponse};

    struct EchoTool;

    #[async_trait::async_trait]
    impl ToolPort for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echo the text back"
        }
        fn parameters(&self) -> Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }
        async fn call(&self, arguments: Value) -> String {
            format!("echo: {}", arguments["text"].as_str().unwrap_or_default())
        }
    }

    fn request(tools: Vec<Arc<dyn ToolPort>>) -> GenerationRequest {
        GenerationRequest {
            prompt_name: "testPrompt",
            instruction: "Say hi".into(),
            output_schema: json!({"type": "object", "properties": {"recapPost": {"type": "string"}}}),
            tools,
        }
    }

    fn content_reply(content: &str) -> CannedResponse {
        CannedResponse::json(
            json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
                .to_string(),
        )
    }

    fn tool_reply(text: &str) -> CannedResponse {
        CannedResponse::json(
            json!({"choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "echo", "arguments": json!({"text": text}).to_string()}
                }]
            }}]})
            .to_string(),
        )
    }

    fn adapter(addr: std::net::SocketAddr) -> OpenAiAdapter {
        OpenAiAdapter::new(
            format!("http://{addr}/v1/chat/completions"),
            "sk-test".into(),
            "gpt-4o-mini".into(),
        )
    }

    fn body_json(raw_request: &str) -> Value {
        let body = raw_request.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("");
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_plain_generation_sends_schema() {
        let (addr, server) = serve(vec![content_reply(r#"{"recapPost": "hi"}"#)]).await;

        let out = adapter(addr).generate(&request(vec![])).await.unwrap();
        assert_eq!(out, r#"{"recapPost": "hi"}"#);

        let requests = server.await.unwrap();
        assert!(requests[0].contains("Bearer sk-test"));
        let body = body_json(&requests[0]);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "testPrompt");
        assert!(body.get("tools").is_none());
        assert_eq!(body["messages"][0]["content"], "Say hi");
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let (addr, server) = serve(vec![
            tool_reply("ping"),
            content_reply(r#"{"recapPost": "done"}"#),
        ])
        .await;

        let out = adapter(addr)
            .generate(&request(vec![Arc::new(EchoTool)]))
            .await
            .unwrap();
        assert_eq!(out, r#"{"recapPost": "done"}"#);

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        let first = body_json(&requests[0]);
        assert_eq!(first["tools"][0]["function"]["name"], "echo");

        let second = body_json(&requests[1]);
        let messages = second["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1]["tool_calls"][0]["id"], "call_1");
        assert_eq!(messages[2]["role"], "tool");
        assert_eq!(messages[2]["content"], "echo: ping");
    }

    #[tokio::test]
    async fn test_tool_rounds_are_capped() {
        let (addr, server) = serve(vec![tool_reply("a"), tool_reply("b")]).await;

        let err = adapter(addr)
            .with_max_tool_rounds(1)
            .generate(&request(vec![Arc::new(EchoTool)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Llm(m) if m.contains("tool rounds")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let (addr, server) = serve(vec![CannedResponse::status(500, "upstream down")]).await;

        let err = adapter(addr).generate(&request(vec![])).await.unwrap_err();
        assert!(matches!(err, DomainError::Llm(m) if m.contains("500")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_model() {
        let call = ToolCall {
            id: "x".into(),
            kind: function_kind(),
            function: FunctionCall {
                name: "nope".into(),
                arguments: "{}".into(),
            },
        };
        let out = run_tool(&[Arc::new(EchoTool) as Arc<dyn ToolPort>], &call).await;
        assert_eq!(out, "Error: Unknown tool 'nope'");
    }
}
