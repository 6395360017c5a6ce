//! OpenAI-compatible chat completion client
//!
//! Both built-in providers accept the same request shape:
//! `POST {base_url}/chat/completions` with a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::tools::ToolDefinition;

use super::{ChatProvider, ChatResponse, Message, ProviderKind, ToolCall};

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything needed to talk to one backend
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

impl ProviderSettings {
    /// Settings with the provider's default endpoint and model
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: api_key.into(),
            base_url: kind.default_base_url().to_string(),
            model: kind.default_model().to_string(),
            max_tokens: None,
            temperature: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Provider speaking the OpenAI chat completion protocol
pub struct OpenAiCompatProvider {
    http: HttpClient,
    endpoint: Url,
    settings: ProviderSettings,
}

impl OpenAiCompatProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let endpoint = chat_endpoint(&settings.base_url)?;

        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Provider(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            settings,
        })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<ChatResponse> {
        debug!(
            provider = self.settings.kind.as_str(),
            model = %self.settings.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.settings.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Provider(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Provider(format!(
                "API request failed with status {}: {}",
                status.as_u16(),
                body
            )));
        }

        parse_completion(&body)
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    fn name(&self) -> String {
        self.settings.kind.as_str().to_string()
    }

    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        cancel: &CancellationToken,
    ) -> Result<ChatResponse> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            tools: (!tools.is_empty()).then(|| tools.iter().map(WireTool::from).collect()),
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = self.send(&request) => result,
        }
    }
}

/// Append `chat/completions` to a base URL, keeping any path prefix
fn chat_endpoint(base_url: &str) -> Result<Url> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)
        .and_then(|url| url.join("chat/completions"))
        .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", base_url, e)))
}

/// Decode a response body into content and tool calls
pub(crate) fn parse_completion(body: &str) -> Result<ChatResponse> {
    let parsed: ChatCompletion = serde_json::from_str(body)
        .map_err(|e| Error::Provider(format!("malformed response body: {}", e)))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::Provider("no choices in response".to_string()))?;

    Ok(ChatResponse {
        content: choice.message.content.unwrap_or_default(),
        tool_calls: choice.message.tool_calls.unwrap_or_default(),
    })
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool<'a>>>,
}

/// `{type: "function", function: {name, description, parameters}}`
#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction<'a>,
}

#[derive(Serialize)]
struct WireFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

impl<'a> From<&'a ToolDefinition> for WireTool<'a> {
    fn from(def: &'a ToolDefinition) -> Self {
        Self {
            kind: ToolCall::FUNCTION,
            function: WireFunction {
                name: &def.name,
                description: &def.description,
                parameters: &def.parameters,
            },
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let url = chat_endpoint("https://open.bigmodel.cn/api/paas/v4").unwrap();
        assert_eq!(url.as_str(), "https://open.bigmodel.cn/api/paas/v4/chat/completions");

        let url = chat_endpoint("https://api.deepseek.com/").unwrap();
        assert_eq!(url.as_str(), "https://api.deepseek.com/chat/completions");

        assert!(chat_endpoint("not a url").is_err());
    }

    #[test]
    fn test_parse_content_response() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello"}}]
        })
        .to_string();
        let response = parse_completion(&body).unwrap();
        assert_eq!(response.content, "Hello");
        assert!(response.tool_calls.is_empty());
    }

    #[test]
    fn test_parse_tool_call_response() {
        let body = json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "list_files", "arguments": "{}"}
                }]
            }}]
        })
        .to_string();
        let response = parse_completion(&body).unwrap();
        assert_eq!(response.content, "");
        assert_eq!(response.tool_calls[0].id, "call_1");
        assert_eq!(response.tool_calls[0].function.name, "list_files");
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(err.to_string().contains("no choices"));

        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_request_wire_format() {
        let def = ToolDefinition {
            name: "read_file".to_string(),
            description: "Read a file".to_string(),
            parameters: json!({"type": "object", "properties": {}, "required": []}),
        };
        let messages = vec![Message::user("hi")];
        let request = ChatRequest {
            model: "glm-4",
            messages: &messages,
            max_tokens: Some(100),
            temperature: None,
            tools: Some(vec![WireTool::from(&def)]),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tools"][0]["type"], "function");
        assert_eq!(value["tools"][0]["function"]["name"], "read_file");
        assert!(value.get("temperature").is_none());
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn test_object_arguments_resent_as_string() {
        let body = json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "read_file", "arguments": {"file_path": "a.txt"}}
                }]
            }}]
        })
        .to_string();
        let response = parse_completion(&body).unwrap();

        let messages = vec![
            Message::user("read a.txt"),
            Message::assistant_with_tool_calls(response.content, response.tool_calls),
        ];
        let request = ChatRequest {
            model: "deepseek-chat",
            messages: &messages,
            max_tokens: None,
            temperature: None,
            tools: None,
        };
        let value = serde_json::to_value(&request).unwrap();

        let arguments = &value["messages"][1]["tool_calls"][0]["function"]["arguments"];
        let text = arguments.as_str().unwrap();
        assert_eq!(serde_json::from_str::<Value>(text).unwrap(), json!({"file_path": "a.txt"}));
    }

    #[test]
    fn test_string_and_missing_arguments_on_the_wire() {
        let messages = vec![Message::assistant_with_tool_calls(
            "",
            vec![
                ToolCall::function("a", "list_files", json!("{\"path\":\"src\"}")),
                ToolCall::function("b", "get_system_info", Value::Null),
            ],
        )];
        let value = serde_json::to_value(&messages).unwrap();
        assert_eq!(value[0]["tool_calls"][0]["function"]["arguments"], "{\"path\":\"src\"}");
        assert_eq!(value[0]["tool_calls"][1]["function"]["arguments"], "{}");
    }
}
