//! Error types for heartloop.

use thiserror::Error;

/// Primary error type for all heartloop operations.
#[derive(Error, Debug)]
pub enum HeartloopError {
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required argument '{argument}' for tool '{tool}'")]
    MissingRequiredArgument { tool: String, argument: String },

    #[error("Invalid argument '{argument}' for tool '{tool}': {message}")]
    InvalidArgument {
        tool: String,
        argument: String,
        message: String,
    },

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Unknown memory section: {0}")]
    UnknownSection(String),

    #[error("Duplicate tool name: {0}")]
    DuplicateToolName(String),

    #[error("Invalid tool spec '{tool}': {message}")]
    InvalidToolSpec { tool: String, message: String },

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

/// Broad classification used by the orchestrator to decide propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Remote call failed; fatal to the current round.
    Transport,
    /// Tool lookup, binding or execution failed; absorbed into the conversation.
    ToolDispatch,
    /// Core memory addressed an undeclared section.
    Memory,
    /// Misconfiguration detected before any round runs.
    Setup,
    /// Conversation invariant broken.
    Protocol,
    /// Local filesystem or (de)serialization failure.
    Io,
}

impl HeartloopError {
    /// Create a transport error from a non-success status and response body.
    pub fn transport(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error for a response body that could not be parsed.
    pub fn malformed_response(status: u16, detail: impl std::fmt::Display) -> Self {
        Self::Transport {
            status: Some(status),
            message: format!("malformed response: {detail}"),
            source: None,
        }
    }

    /// HTTP status attached to a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::UnknownTool(_)
            | Self::MissingRequiredArgument { .. }
            | Self::InvalidArgument { .. }
            | Self::ToolExecution { .. } => ErrorCategory::ToolDispatch,
            Self::UnknownSection(_) => ErrorCategory::Memory,
            Self::DuplicateToolName(_) | Self::InvalidToolSpec { .. } | Self::Configuration(_) => {
                ErrorCategory::Setup
            }
            Self::ProtocolViolation(_) => ErrorCategory::Protocol,
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::Io,
        }
    }

    /// Whether the loop converts this error into a model-visible tool result
    /// instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::ToolDispatch | ErrorCategory::Memory
        )
    }
}

impl From<reqwest::Error> for HeartloopError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, HeartloopError>;
