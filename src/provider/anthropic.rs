//! Anthropic Messages API provider.

use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{HeartloopError, Result};
use crate::types::*;

use super::http::{anthropic_headers, shared_client, status_to_error};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    model: String,
    api_key: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_headers(&self) -> reqwest::header::HeaderMap {
        anthropic_headers(&self.api_key, API_VERSION)
    }

    fn build_request_body(&self, request: &ProviderRequest) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = request
            .messages
            .iter()
            .filter_map(|msg| {
                let content = build_anthropic_content(&msg.content);
                // The API rejects messages with an empty content array.
                if content.as_array().is_some_and(Vec::is_empty) {
                    return None;
                }
                Some(serde_json::json!({
                    "role": msg.role,
                    "content": content,
                }))
            })
            .collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": request.settings.max_tokens,
            "temperature": request.settings.temperature,
            "messages": messages,
        });

        if !request.system.is_empty() {
            body["system"] = serde_json::json!(request.system);
        }
        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(request.tools);
        }

        body
    }
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let body = self.build_request_body(request);
        let url = format!("{}/messages", self.base_url);

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Anthropic complete"
        );

        let resp = shared_client()
            .post(&url)
            .headers(self.build_headers())
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body_text = resp.text().await?;
        if status != 200 {
            return Err(status_to_error(status, &body_text));
        }

        let data: AnthropicResponse = serde_json::from_str(&body_text)
            .map_err(|e| HeartloopError::malformed_response(status, e))?;
        parse_response(data).map_err(|detail| HeartloopError::malformed_response(status, detail))
    }
}

fn build_anthropic_content(blocks: &[ContentBlock]) -> serde_json::Value {
    let content: Vec<serde_json::Value> = blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } if text.is_empty() => None,
            ContentBlock::Text { text } => Some(serde_json::json!({"type": "text", "text": text})),
            ContentBlock::ToolUse(use_) => Some(serde_json::json!({
                "type": "tool_use",
                "id": use_.id,
                "name": use_.name,
                "input": use_.input,
            })),
            ContentBlock::ToolResult(result) => Some(serde_json::json!({
                "type": "tool_result",
                "tool_use_id": result.tool_use_id,
                "content": result.content,
                "is_error": result.is_error,
            })),
        })
        .collect();
    serde_json::json!(content)
}

fn parse_response(data: AnthropicResponse) -> std::result::Result<ProviderResponse, String> {
    let mut content = Vec::with_capacity(data.content.len());
    for block in data.content {
        match block.r#type.as_str() {
            "text" => content.push(ContentBlock::text(block.text.unwrap_or_default())),
            "tool_use" => {
                let (Some(id), Some(name)) = (block.id, block.name) else {
                    return Err("tool_use block without id or name".into());
                };
                let input = match block.input {
                    None | Some(serde_json::Value::Null) => ToolInput::new(),
                    Some(serde_json::Value::Object(map)) => map,
                    Some(_) => return Err(format!("tool_use '{id}' input is not an object")),
                };
                content.push(ContentBlock::tool_use(id, name, input));
            }
            other => debug!(block_type = other, "ignoring content block"),
        }
    }

    let stop_reason = data
        .stop_reason
        .as_deref()
        .and_then(|s| StopReason::from_str(s).ok());

    Ok(ProviderResponse {
        content,
        stop_reason,
        usage: Usage {
            input_tokens: data.usage.input_tokens,
            output_tokens: data.usage.output_tokens,
            cache_read_input_tokens: data.usage.cache_read_input_tokens,
            cache_creation_input_tokens: data.usage.cache_creation_input_tokens,
        },
    })
}

// Internal Anthropic response types

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: AnthropicUsage,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    r#type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    input: Option<serde_json::Value>,
}

#[derive(Deserialize, Default)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
    #[serde(default)]
    cache_read_input_tokens: Option<u32>,
    #[serde(default)]
    cache_creation_input_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ToolDefinition;
    use crate::tools::ToolSpec;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: Option<String>) -> AnthropicProvider {
        AnthropicProvider::new(DEFAULT_MODEL, "test-key", base_url)
    }

    fn request(messages: Vec<Message>) -> ProviderRequest {
        ProviderRequest {
            settings: GenerationSettings::default(),
            system: "MEMORY:\nUser:\n\n".into(),
            tools: vec![ToolDefinition::from(
                &ToolSpec::new("getWeather", "weather").string("location", "city", true),
            )],
            messages,
        }
    }

    fn weather_exchange() -> Vec<Message> {
        vec![
            Message::user("What is the weather in Boston?"),
            Message::assistant(vec![
                ContentBlock::text(""),
                ContentBlock::tool_use(
                    "t1",
                    "getWeather",
                    serde_json::json!({"location": "Boston, MA"})
                        .as_object()
                        .cloned()
                        .unwrap(),
                ),
            ]),
            Message::tool_result(ToolResult::new("t1", "getWeather", "10")),
        ]
    }

    #[test]
    fn request_body_has_wire_shape() {
        let body = provider(None).build_request_body(&request(weather_exchange()));

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["system"], "MEMORY:\nUser:\n\n");
        assert_eq!(body["tools"][0]["name"], "getWeather");
        assert_eq!(body["tools"][0]["input_schema"]["type"], "object");

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"][0]["text"], "What is the weather in Boston?");

        // Empty text blocks are dropped.
        let assistant = messages[1]["content"].as_array().unwrap();
        assert_eq!(assistant.len(), 1);
        assert_eq!(assistant[0]["type"], "tool_use");
        assert_eq!(assistant[0]["input"]["location"], "Boston, MA");

        assert_eq!(
            messages[2]["content"][0],
            serde_json::json!({
                "type": "tool_result",
                "tool_use_id": "t1",
                "content": "10",
                "is_error": false,
            })
        );
    }

    #[test]
    fn request_body_skips_messages_with_no_content() {
        let body = provider(None).build_request_body(&request(vec![
            Message::user("hi"),
            Message::assistant(vec![ContentBlock::text("")]),
            Message::user("again"),
        ]));

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages
            .iter()
            .all(|m| !m["content"].as_array().unwrap().is_empty()));
        assert_eq!(messages[1]["content"][0]["text"], "again");
    }

    #[test]
    fn request_body_omits_empty_system_and_tools() {
        let mut req = request(vec![Message::user("hi")]);
        req.system.clear();
        req.tools.clear();
        let body = provider(None).build_request_body(&req);
        assert!(body.get("system").is_none());
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = provider(Some("http://localhost:8080/v1/".into()));
        assert_eq!(provider.base_url(), "http://localhost:8080/v1");
    }

    #[tokio::test]
    async fn complete_parses_text_and_tool_use() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", API_VERSION))
            .and(body_partial_json(serde_json::json!({"model": DEFAULT_MODEL})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_1",
                "type": "message",
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "Let me check."},
                    {"type": "tool_use", "id": "t1", "name": "getWeather", "input": {"location": "Boston, MA"}},
                    {"type": "thinking", "thinking": "hmm", "signature": "sig"}
                ],
                "stop_reason": "tool_use",
                "usage": {"input_tokens": 12, "output_tokens": 7}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(Some(server.uri()))
            .complete(&request(vec![Message::user("weather?")]))
            .await
            .unwrap();

        assert_eq!(response.content.len(), 2);
        assert_eq!(response.content[0].as_text(), Some("Let me check."));
        let tool_use = response.content[1].as_tool_use().unwrap();
        assert_eq!(tool_use.id, "t1");
        assert_eq!(tool_use.input["location"], "Boston, MA");
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(response.usage.total_tokens(), 19);
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = provider(Some(server.uri()))
            .complete(&request(vec![Message::user("hi")]))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(529));
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn malformed_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider(Some(server.uri()))
            .complete(&request(vec![Message::user("hi")]))
            .await
            .unwrap_err();

        assert!(matches!(err, HeartloopError::Transport { .. }));
        assert!(err.to_string().contains("malformed response"));
    }

    #[tokio::test]
    async fn non_object_tool_input_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"type": "tool_use", "id": "t1", "name": "getWeather", "input": "Boston"}],
                "stop_reason": "tool_use",
                "usage": {"input_tokens": 1, "output_tokens": 1}
            })))
            .mount(&server)
            .await;

        let err = provider(Some(server.uri()))
            .complete(&request(vec![Message::user("hi")]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("input is not an object"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let err = provider(Some("http://127.0.0.1:1".into()))
            .complete(&request(vec![Message::user("hi")]))
            .await
            .unwrap_err();

        assert!(matches!(err, HeartloopError::Transport { status: None, .. }));
    }
}
