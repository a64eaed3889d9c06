//! Model provider trait and the Anthropic Messages implementation.

pub mod anthropic;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tools::ToolSpec;
use crate::types::{ContentBlock, GenerationSettings, Message, StopReason, Usage};

pub use anthropic::AnthropicProvider;

/// A request sent to a model provider: one full round of context.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub settings: GenerationSettings,
    pub system: String,
    pub tools: Vec<ToolDefinition>,
    pub messages: Vec<Message>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl From<&ToolSpec> for ToolDefinition {
    fn from(spec: &ToolSpec) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            input_schema: spec.input_schema(),
        }
    }
}

/// Response from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    pub usage: Usage,
}

impl ProviderResponse {
    /// Plain-text response with no tool use.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
            usage: Usage::default(),
        }
    }

    pub fn has_tool_use(&self) -> bool {
        self.content.iter().any(|b| b.as_tool_use().is_some())
    }
}

/// Core trait implemented by model providers.
///
/// One call per round, pass or fail. Every failure (status, body or network)
/// surfaces as [`HeartloopError::Transport`](crate::error::HeartloopError::Transport).
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g. "anthropic").
    fn provider_name(&self) -> &str;
    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderResponse>;
}
