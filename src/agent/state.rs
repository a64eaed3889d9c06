//! The single mutable aggregate a session owns.

use bon::Builder;
use chrono::Utc;

use super::conversation::Conversation;
use super::DEFAULT_PERSONA;
use crate::error::Result;
use crate::memory::CoreMemory;
use crate::session::{SessionSnapshot, SNAPSHOT_VERSION};
use crate::tools::ToolRegistry;

/// Conversation, tools, core memory and the heartbeat flag of one session.
#[derive(Debug, Clone, Builder)]
pub struct AgentState {
    #[builder(default)]
    pub conversation: Conversation,
    #[builder(default)]
    pub tools: ToolRegistry,
    #[builder(default = CoreMemory::with_default_sections())]
    pub memory: CoreMemory,
    /// Whether another round may run. Tools change it; it survives across runs.
    #[builder(default = true)]
    pub heartbeat: bool,
    #[builder(into, default = DEFAULT_PERSONA.to_string())]
    pub persona: String,
}

impl Default for AgentState {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AgentState {
    /// Persona followed by the rendered core memory.
    pub fn system_prompt(&self) -> String {
        let memory = self.memory.render();
        if self.persona.trim().is_empty() {
            format!("MEMORY:\n{memory}")
        } else {
            format!("{}\n\nMEMORY:\n{memory}", self.persona.trim_end())
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            persona: self.persona.clone(),
            heartbeat: self.heartbeat,
            memory: self.memory.sections().to_vec(),
            messages: self.conversation.snapshot(),
            saved_at: Utc::now(),
        }
    }

    /// Rebuild state from a snapshot. The conversation is re-validated
    /// message by message, so a tampered log fails here rather than at the
    /// provider.
    pub fn restore(snapshot: SessionSnapshot, tools: ToolRegistry) -> Result<Self> {
        Ok(Self {
            conversation: Conversation::from_messages(snapshot.messages)?,
            tools,
            memory: CoreMemory::from_sections(snapshot.memory)?,
            heartbeat: snapshot.heartbeat,
            persona: snapshot.persona,
        })
    }
}
