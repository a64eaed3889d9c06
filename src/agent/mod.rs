//! Agent state: conversation, tools, core memory and heartbeat.

pub mod conversation;
pub mod state;

pub use conversation::Conversation;
pub use state::AgentState;

/// System preamble used when no persona is given.
pub const DEFAULT_PERSONA: &str = "You are a helpful AI agent with access to a core memory. \
Core memory is shown below under MEMORY and is always visible to you. \
Use `coreMemoryAppend` to save new facts about the user or yourself, and \
`coreMemoryReplace` to correct or remove facts that are already stored. \
Set `requestHeartbeat` to true when you want to take another step before \
replying, and call `pauseHeartbeats` when you are done.";
