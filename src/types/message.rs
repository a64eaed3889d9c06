//! Conversation content: messages and their content blocks.

use serde::{Deserialize, Serialize};

/// Argument mapping carried by a tool-use block.
pub type ToolInput = serde_json::Map<String, serde_json::Value>;

/// Conversation role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single piece of conversational content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ToolUse(ToolUse),
    ToolResult(ToolResult),
}

/// A tool invocation requested by the model. One invocation per block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolUse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub input: ToolInput,
}

/// The locally authored outcome of a [`ToolUse`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub tool_use_id: String,
    pub name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: ToolInput) -> Self {
        Self::ToolUse(ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        })
    }

    pub fn tool_result(
        tool_use_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::ToolResult(ToolResult::new(tool_use_id, name, content))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<&ToolUse> {
        match self {
            Self::ToolUse(tool_use) => Some(tool_use),
            _ => None,
        }
    }

    pub fn as_tool_result(&self) -> Option<&ToolResult> {
        match self {
            Self::ToolResult(result) => Some(result),
            _ => None,
        }
    }
}

impl ToolResult {
    pub fn new(
        tool_use_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            name: name.into(),
            content: content.into(),
            is_error: false,
        }
    }

    /// Build an error result; the message is what the model will read.
    pub fn error(
        tool_use_id: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            name: name.into(),
            content: message.into(),
            is_error: true,
        }
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a user message with a single text block.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// Create an assistant message from response content.
    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Wrap a tool result in the user-role message the endpoint expects.
    pub fn tool_result(result: ToolResult) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::ToolResult(result)],
        }
    }

    /// Text blocks joined by a blank line, in block order.
    pub fn text(&self) -> String {
        joined_text(&self.content)
    }

    /// Tool-use blocks in response order.
    pub fn tool_uses(&self) -> Vec<&ToolUse> {
        self.content
            .iter()
            .filter_map(ContentBlock::as_tool_use)
            .collect()
    }
}

/// Concatenate the text blocks of `blocks`, separated by a blank line.
pub fn joined_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(ContentBlock::as_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn content_blocks_use_type_tag() {
        let mut input = ToolInput::new();
        input.insert("location".into(), json!("Boston, MA"));
        let block = ContentBlock::tool_use("t1", "getWeather", input);

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "tool_use",
                "id": "t1",
                "name": "getWeather",
                "input": {"location": "Boston, MA"},
            })
        );
    }

    #[test]
    fn is_error_is_omitted_when_false() {
        let block = ContentBlock::tool_result("t1", "getWeather", "10");
        let value = serde_json::to_value(&block).unwrap();
        assert!(value.get("is_error").is_none());

        let block = ContentBlock::ToolResult(ToolResult::error("t1", "getWeather", "bad"));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["is_error"], true);
    }

    #[test]
    fn text_joins_only_text_blocks() {
        let message = Message::assistant(vec![
            ContentBlock::text("first"),
            ContentBlock::tool_use("t1", "noop", ToolInput::new()),
            ContentBlock::text("second"),
        ]);
        assert_eq!(message.text(), "first\n\nsecond");
        assert_eq!(message.tool_uses().len(), 1);
    }

    #[test]
    fn tool_result_messages_are_user_role() {
        let message = Message::tool_result(ToolResult::error("t9", "x", "nope"));
        assert_eq!(message.role, Role::User);
    }
}
