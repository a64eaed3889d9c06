//! The round-by-round orchestrator.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::limits::RunnerLimits;
use super::types::{Continuation, LoopExit, RoundOutcome, RoundPhase, RunResult};
use crate::agent::AgentState;
use crate::config::AgentConfig;
use crate::error::{HeartloopError, Result};
use crate::provider::{AnthropicProvider, ModelProvider, ProviderRequest, ToolDefinition};
use crate::types::{
    joined_text, ContentBlock, GenerationSettings, Message, ToolResult, ToolUse, Usage,
};

/// Decide whether another round runs.
///
/// A round with no tool use always ends the run, then a cleared heartbeat,
/// then the round bound.
pub fn decide_continuation(
    heartbeat: bool,
    tool_uses: usize,
    round: usize,
    limits: &RunnerLimits,
) -> Continuation {
    if tool_uses == 0 {
        Continuation::Stop(LoopExit::NoToolUse)
    } else if !heartbeat {
        Continuation::Stop(LoopExit::HeartbeatStopped)
    } else if round >= limits.max_rounds {
        Continuation::Stop(LoopExit::RoundLimit)
    } else {
        Continuation::Continue
    }
}

/// Drives an [`AgentState`] against a model provider.
///
/// Strictly sequential: the provider call is the only await point that
/// leaves the process, and tools run one at a time in response order.
pub struct Agent {
    provider: Arc<dyn ModelProvider>,
    settings: GenerationSettings,
    limits: RunnerLimits,
    state: AgentState,
    round: usize,
}

impl Agent {
    pub fn new(provider: Arc<dyn ModelProvider>, state: AgentState) -> Self {
        Self {
            provider,
            settings: GenerationSettings::default(),
            limits: RunnerLimits::default(),
            state,
            round: 0,
        }
    }

    /// Build an Anthropic-backed agent from resolved configuration.
    pub fn from_config(config: &AgentConfig, state: AgentState) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            HeartloopError::Configuration("Missing ANTHROPIC_API_KEY".into())
        })?;
        let provider =
            AnthropicProvider::new(config.model.clone(), api_key, config.base_url.clone());
        Ok(Self::new(Arc::new(provider), state)
            .with_settings(config.generation_settings())
            .with_limits(config.limits()))
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_limits(mut self, limits: RunnerLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AgentState {
        &mut self.state
    }

    pub fn into_state(self) -> AgentState {
        self.state
    }

    pub fn provider(&self) -> &dyn ModelProvider {
        self.provider.as_ref()
    }

    pub fn limits(&self) -> RunnerLimits {
        self.limits
    }

    /// Append `prompt` as a user message and run rounds until the loop
    /// stops.
    ///
    /// A new prompt re-arms the heartbeat. A transport failure aborts the
    /// run and is returned. If it happens in the first round the prompt is
    /// removed again, so retrying the same prompt does not duplicate it;
    /// otherwise whatever earlier rounds appended stays in the conversation.
    pub async fn run(&mut self, prompt: impl Into<String>) -> Result<RunResult> {
        let run_id = Uuid::new_v4();
        self.state.conversation.add_user_message(prompt);
        self.state.heartbeat = true;
        self.round = 0;

        let mut usage = Usage::default();
        loop {
            let outcome = match self.step().await {
                Ok(outcome) => outcome,
                Err(err) => {
                    if self.round == 0 {
                        self.state.conversation.retract_user_text();
                    }
                    return Err(err);
                }
            };
            usage.merge(&outcome.usage);

            if let Continuation::Stop(exit) = outcome.continuation {
                info!(%run_id, rounds = outcome.round, %exit, "run finished");
                return Ok(RunResult {
                    run_id,
                    output: outcome.text,
                    exit,
                    rounds: outcome.round,
                    usage,
                    finished_at: Utc::now(),
                });
            }
        }
    }

    /// Run exactly one round against the current state.
    pub async fn step(&mut self) -> Result<RoundOutcome> {
        let round = self.round + 1;

        debug!(round, phase = %RoundPhase::AwaitingModel, "round phase");
        let request = self.build_request();
        let response = self.provider.complete(&request).await.map_err(|err| {
            warn!(round, error = %err, "provider call failed");
            err
        })?;
        // The round only counts once the provider has answered.
        self.round = round;

        debug!(round, phase = %RoundPhase::ProcessingResponse, blocks = response.content.len(), "round phase");
        let text = joined_text(&response.content);
        let tool_uses: Vec<ToolUse> = response
            .content
            .iter()
            .filter_map(|block| block.as_tool_use().cloned())
            .collect();
        let content: Vec<ContentBlock> = response
            .content
            .into_iter()
            .filter(|block| !matches!(block, ContentBlock::Text { text } if text.is_empty()))
            .collect();
        if content.is_empty() {
            debug!(round, "empty assistant reply not recorded");
        } else {
            self.state.conversation.append(Message::assistant(content))?;
        }

        let mut tool_errors = 0;
        if !tool_uses.is_empty() {
            debug!(round, phase = %RoundPhase::ExecutingTools, count = tool_uses.len(), "round phase");
        }
        for tool_use in &tool_uses {
            let result = self.execute_tool(round, tool_use).await;
            if result.is_error {
                tool_errors += 1;
            }
            self.state.conversation.append(Message::tool_result(result))?;
        }

        debug!(round, phase = %RoundPhase::DecidingContinuation, heartbeat = self.state.heartbeat, "round phase");
        let continuation =
            decide_continuation(self.state.heartbeat, tool_uses.len(), round, &self.limits);
        if !continuation.should_continue() {
            debug!(round, phase = %RoundPhase::Done, "round phase");
        }

        Ok(RoundOutcome {
            round,
            text,
            tool_uses: tool_uses.len(),
            tool_errors,
            stop_reason: response.stop_reason,
            usage: response.usage,
            continuation,
        })
    }

    fn build_request(&self) -> ProviderRequest {
        ProviderRequest {
            settings: self.settings.clone(),
            system: self.state.system_prompt(),
            tools: self
                .state
                .tools
                .describe_all()
                .into_iter()
                .map(ToolDefinition::from)
                .collect(),
            messages: self.state.conversation.snapshot(),
        }
    }

    /// Invoke one tool and turn the outcome into a result block. Tool
    /// failures never abort the round; the model reads them instead.
    async fn execute_tool(&mut self, round: usize, tool_use: &ToolUse) -> ToolResult {
        let state = &mut self.state;
        match state
            .tools
            .invoke(&tool_use.name, &tool_use.input, &mut state.memory)
            .await
        {
            Ok(output) => {
                if let Some(heartbeat) = output.heartbeat {
                    state.heartbeat = heartbeat;
                }
                debug!(round, tool = %tool_use.name, tool_use_id = %tool_use.id, heartbeat = ?output.heartbeat, "tool succeeded");
                ToolResult::new(&tool_use.id, &tool_use.name, output.content)
            }
            Err(err) => {
                warn!(round, tool = %tool_use.name, tool_use_id = %tool_use.id, error = %err, "tool failed");
                ToolResult::error(&tool_use.id, &tool_use.name, err.to_string())
            }
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_id())
            .field("settings", &self.settings)
            .field("limits", &self.limits)
            .field("state", &self.state)
            .finish()
    }
}
