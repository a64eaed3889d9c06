//! Convenience re-exports for common use.

pub use crate::agent::{AgentState, Conversation};
pub use crate::agent_loop::{Agent, LoopExit, RoundOutcome, RunResult, RunnerLimits};
pub use crate::config::AgentConfig;
pub use crate::error::{HeartloopError, Result};
pub use crate::memory::CoreMemory;
pub use crate::provider::{AnthropicProvider, ModelProvider, ProviderRequest, ProviderResponse};
pub use crate::session::{FileSessionStore, SessionSnapshot, SessionStore};
pub use crate::tools::{FunctionTool, Tool, ToolContext, ToolOutput, ToolRegistry, ToolSpec};
pub use crate::types::{ContentBlock, GenerationSettings, Message, Role, StopReason, Usage};
