//! Tool trait and closure-based tool wrapper.

use std::fmt::Display;

use async_trait::async_trait;

use super::arguments::BoundArguments;
use super::types::ToolSpec;
use crate::error::Result;
use crate::memory::CoreMemory;

/// State a handler may read or mutate while it runs.
///
/// Handlers run one at a time, so a handler sees every mutation made by
/// the handlers before it in the same round.
#[derive(Debug)]
pub struct ToolContext<'a> {
    pub memory: &'a mut CoreMemory,
}

impl<'a> ToolContext<'a> {
    pub fn new(memory: &'a mut CoreMemory) -> Self {
        Self { memory }
    }
}

/// What a handler returns on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Result text reported back to the model.
    pub content: String,
    /// Continuation request: `Some(true)` asks for another round,
    /// `Some(false)` asks the loop to stop, `None` leaves it unchanged.
    pub heartbeat: Option<bool>,
}

impl ToolOutput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            heartbeat: None,
        }
    }

    /// Render any displayable value as the result text.
    pub fn value(value: impl Display) -> Self {
        Self::text(value.to_string())
    }

    /// Serialize structured data as the result text.
    pub fn json(value: &impl serde::Serialize) -> Result<Self> {
        Ok(Self::text(serde_json::to_string(value)?))
    }

    pub fn with_heartbeat(mut self, heartbeat: bool) -> Self {
        self.heartbeat = Some(heartbeat);
        self
    }
}

/// Core tool trait; implement to create custom tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Declared interface sent to the model.
    fn spec(&self) -> &ToolSpec;

    fn name(&self) -> &str {
        &self.spec().name
    }

    /// Execute with arguments already bound to the spec.
    async fn execute(&self, args: &BoundArguments, ctx: &mut ToolContext<'_>) -> Result<ToolOutput>;
}

type ToolHandler =
    dyn Fn(&BoundArguments, &mut ToolContext<'_>) -> Result<ToolOutput> + Send + Sync;

/// Closure-based tool for quick tool creation.
pub struct FunctionTool {
    spec: ToolSpec,
    handler: Box<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F>(spec: ToolSpec, handler: F) -> Self
    where
        F: Fn(&BoundArguments, &mut ToolContext<'_>) -> Result<ToolOutput> + Send + Sync + 'static,
    {
        Self {
            spec,
            handler: Box::new(handler),
        }
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, args: &BoundArguments, ctx: &mut ToolContext<'_>) -> Result<ToolOutput> {
        (self.handler)(args, ctx)
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.spec.name)
            .field("description", &self.spec.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_uses_display() {
        assert_eq!(ToolOutput::value(10.0_f32).content, "10");
        assert_eq!(ToolOutput::value(24.5_f32).content, "24.5");
    }

    #[test]
    fn json_output_serializes() {
        let output = ToolOutput::json(&serde_json::json!({"ok": true})).unwrap();
        assert_eq!(output.content, r#"{"ok":true}"#);
        assert_eq!(output.heartbeat, None);
    }

    #[tokio::test]
    async fn function_tool_runs_closure() {
        let tool = FunctionTool::new(ToolSpec::new("ping", "Reply pong"), |_args, _ctx| {
            Ok(ToolOutput::text("pong").with_heartbeat(false))
        });
        let mut memory = CoreMemory::new();
        let args = BoundArguments::bind(tool.spec(), &Default::default()).unwrap();

        let output = tool
            .execute(&args, &mut ToolContext::new(&mut memory))
            .await
            .unwrap();

        assert_eq!(tool.name(), "ping");
        assert_eq!(output.content, "pong");
        assert_eq!(output.heartbeat, Some(false));
    }
}
