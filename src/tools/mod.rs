//! Tool system for function calling.

pub mod arguments;
pub mod builtin;
pub mod registry;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::BoundArguments;
pub use registry::ToolRegistry;
pub use tool::{FunctionTool, Tool, ToolContext, ToolOutput};
pub use types::{ParameterSpec, ParameterType, ToolSpec};
