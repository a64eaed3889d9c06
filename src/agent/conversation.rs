//! Conversation message history.

use std::collections::HashSet;

use crate::error::{HeartloopError, Result};
use crate::types::{ContentBlock, Message, Role};

/// Append-only message log.
///
/// Every tool-result block must answer a tool-use block that appeared
/// earlier in the same conversation, and may only travel in a user message.
/// [`Conversation::append`] enforces both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
    tool_use_ids: HashSet<String>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a conversation, re-checking every message in order.
    pub fn from_messages(messages: impl IntoIterator<Item = Message>) -> Result<Self> {
        let mut conversation = Self::new();
        for message in messages {
            conversation.append(message)?;
        }
        Ok(conversation)
    }

    /// Append a message. Existing messages are never touched.
    pub fn append(&mut self, message: Message) -> Result<()> {
        for block in &message.content {
            if let ContentBlock::ToolResult(result) = block {
                if message.role != Role::User {
                    return Err(HeartloopError::ProtocolViolation(format!(
                        "tool result '{}' must be sent in a user message",
                        result.tool_use_id
                    )));
                }
                if !self.tool_use_ids.contains(&result.tool_use_id) {
                    return Err(HeartloopError::ProtocolViolation(format!(
                        "tool result '{}' does not answer any earlier tool use",
                        result.tool_use_id
                    )));
                }
            }
        }
        let ids: Vec<String> = message.tool_uses().iter().map(|u| u.id.clone()).collect();
        self.tool_use_ids.extend(ids);
        self.messages.push(message);
        Ok(())
    }

    /// Add a user text message.
    pub fn add_user_message(&mut self, text: impl Into<String>) {
        // A text-only user message cannot break the tool-result invariant.
        self.messages.push(Message::user(text));
    }

    /// Remove the trailing user text message, if that is what the log ends
    /// with. Used to undo a prompt whose first round never reached the model.
    pub(crate) fn retract_user_text(&mut self) -> Option<Message> {
        let last = self.messages.last()?;
        let text_only = last
            .content
            .iter()
            .all(|block| matches!(block, ContentBlock::Text { .. }));
        if last.role != Role::User || !text_only {
            return None;
        }
        self.messages.pop()
    }

    /// Read-only copy of the log.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
