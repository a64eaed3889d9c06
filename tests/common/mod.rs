//! Shared test helpers and a scripted provider.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use heartloop::agent::AgentState;
use heartloop::agent_loop::Agent;
use heartloop::error::{HeartloopError, Result};
use heartloop::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use heartloop::tools::{builtin, ToolRegistry};
use heartloop::types::*;

/// A provider that replays queued responses and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<ProviderResponse>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a text-only response.
    pub fn queue_text(&self, text: &str) {
        self.queue(Ok(ProviderResponse {
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
            usage: usage(10, 20),
        }));
    }

    /// Queue a response with leading text followed by tool uses.
    pub fn queue_tool_uses(&self, text: &str, uses: &[(&str, &str, serde_json::Value)]) {
        let mut content = Vec::new();
        if !text.is_empty() {
            content.push(ContentBlock::text(text));
        }
        for (id, name, input) in uses {
            content.push(ContentBlock::tool_use(
                *id,
                *name,
                input.as_object().cloned().unwrap_or_default(),
            ));
        }
        self.queue(Ok(ProviderResponse {
            content,
            stop_reason: Some(StopReason::ToolUse),
            usage: usage(10, 5),
        }));
    }

    /// Queue a single tool use.
    pub fn queue_tool_use(&self, id: &str, name: &str, input: serde_json::Value) {
        self.queue_tool_uses("", &[(id, name, input)]);
    }

    /// Queue a transport failure.
    pub fn queue_failure(&self, status: u16, body: &str) {
        self.queue(Err(HeartloopError::transport(status, body)));
    }

    pub fn queue(&self, response: Result<ProviderResponse>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HeartloopError::transport(500, "script exhausted")))
    }
}

pub fn usage(input: u32, output: u32) -> Usage {
    Usage {
        input_tokens: input,
        output_tokens: output,
        ..Default::default()
    }
}

/// Registry with every built-in tool.
pub fn builtin_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in builtin::all_tools() {
        registry.register_arc(tool).unwrap();
    }
    registry
}

/// An agent over `provider` with the built-in tools and default memory.
pub fn agent_with(provider: Arc<ScriptedProvider>) -> Agent {
    let state = AgentState::builder().tools(builtin_registry()).build();
    Agent::new(provider, state)
}
