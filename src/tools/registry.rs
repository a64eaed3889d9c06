//! Name → tool lookup with registration-order descriptions.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::arguments::BoundArguments;
use super::tool::{Tool, ToolContext, ToolOutput};
use super::types::ToolSpec;
use super::validation::validate_spec;
use crate::error::{HeartloopError, Result};
use crate::memory::CoreMemory;
use crate::types::ToolInput;

/// Registered tools, in registration order.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Its spec is validated here, once.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<()> {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        validate_spec(tool.spec())?;
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(HeartloopError::DuplicateToolName(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style registration.
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Result<Self> {
        self.register(tool)?;
        Ok(self)
    }

    /// Every spec, in registration order. This is all the model learns
    /// about available capabilities.
    pub fn describe_all(&self) -> Vec<&ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up, bind and execute a tool.
    ///
    /// Lookup and binding failures surface as `UnknownTool`,
    /// `MissingRequiredArgument` or `InvalidArgument`; any failure raised by
    /// the handler itself is wrapped as `ToolExecution`.
    pub async fn invoke(
        &self,
        name: &str,
        input: &ToolInput,
        memory: &mut CoreMemory,
    ) -> Result<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| HeartloopError::UnknownTool(name.to_string()))?;
        let args = BoundArguments::bind(tool.spec(), input)?;

        debug!(tool = name, arguments = args.len(), "executing tool");
        let mut ctx = ToolContext::new(memory);
        tool.execute(&args, &mut ctx).await.map_err(|err| match err {
            HeartloopError::ToolExecution { .. } => err,
            other => HeartloopError::ToolExecution {
                tool_name: name.to_string(),
                message: other.to_string(),
            },
        })
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}
