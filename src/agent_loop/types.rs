//! Core run types for the agent loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::types::{StopReason, Usage};

/// Unique run identifier.
pub type RunId = Uuid;

/// Where a round currently is. Used for tracing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RoundPhase {
    AwaitingModel,
    ProcessingResponse,
    ExecutingTools,
    DecidingContinuation,
    Done,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoopExit {
    /// The model's response contained no tool use.
    NoToolUse,
    /// A tool cleared the heartbeat.
    HeartbeatStopped,
    /// The run used all of its rounds.
    RoundLimit,
}

/// Decision taken at the end of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Continue,
    Stop(LoopExit),
}

impl Continuation {
    pub fn should_continue(self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// What one round produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    /// 1-based round number within the current run.
    pub round: usize,
    /// The response's text blocks joined by a blank line.
    pub text: String,
    /// Number of tool-use blocks executed this round.
    pub tool_uses: usize,
    /// Number of those that produced an error result.
    pub tool_errors: usize,
    pub stop_reason: Option<StopReason>,
    pub usage: Usage,
    pub continuation: Continuation,
}

/// Result of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunResult {
    pub run_id: RunId,
    /// Final round's text blocks joined by a blank line.
    pub output: String,
    pub exit: LoopExit,
    pub rounds: usize,
    pub usage: Usage,
    pub finished_at: DateTime<Utc>,
}
