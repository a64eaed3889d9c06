//! Built-in tools: core memory editing, heartbeat control, and a weather demo.
//!
//! Each tool is constructed via [`FunctionTool::new`] and returned as
//! `Arc<dyn Tool>`, ready for [`ToolRegistry::register_arc`].
//!
//! ```rust
//! use heartloop::tools::{builtin::all_tools, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! for tool in all_tools() {
//!     registry.register_arc(tool).unwrap();
//! }
//! assert_eq!(registry.len(), 4);
//! ```
//!
//! [`ToolRegistry::register_arc`]: super::ToolRegistry::register_arc

use std::sync::Arc;

use super::tool::{FunctionTool, Tool, ToolOutput};
use super::types::ToolSpec;

pub const CORE_MEMORY_APPEND: &str = "coreMemoryAppend";
pub const CORE_MEMORY_REPLACE: &str = "coreMemoryReplace";
pub const PAUSE_HEARTBEATS: &str = "pauseHeartbeats";
pub const GET_WEATHER: &str = "getWeather";

const SECTION_DESCRIPTION: &str =
    "Name of the core memory section to edit, e.g. `User` for facts about the human or `Agent` for facts about yourself.";
const HEARTBEAT_DESCRIPTION: &str =
    "Request an immediate follow-up step after this call. Set to `true` if you want to keep working before replying.";

/// Create the `coreMemoryAppend` tool: appends a line to a memory section.
pub fn core_memory_append_tool() -> Arc<dyn Tool> {
    Arc::new(FunctionTool::new(
        ToolSpec::new(
            CORE_MEMORY_APPEND,
            "Append new information to a section of your core memory. Core memory is always visible to you.",
        )
        .string("section", SECTION_DESCRIPTION, true)
        .string("newContent", "Content to append. It is added on a new line.", true)
        .boolean("requestHeartbeat", HEARTBEAT_DESCRIPTION, true),
        |args, ctx| {
            let section = args.get_str("section")?;
            let content = args.get_str("newContent")?;
            let heartbeat = args.get_bool("requestHeartbeat")?;

            ctx.memory.append(section, content)?;
            Ok(ToolOutput::text(format!("Appended to core memory section '{section}'."))
                .with_heartbeat(heartbeat))
        },
    ))
}

/// Create the `coreMemoryReplace` tool: literal replace-all inside a section.
pub fn core_memory_replace_tool() -> Arc<dyn Tool> {
    Arc::new(FunctionTool::new(
        ToolSpec::new(
            CORE_MEMORY_REPLACE,
            "Replace existing text in a section of your core memory. Every occurrence of oldContent is replaced. To delete text, pass an empty newContent.",
        )
        .string("section", SECTION_DESCRIPTION, true)
        .string("oldContent", "Exact text to find in the section.", true)
        .string("newContent", "Text to put in its place.", true)
        .boolean("requestHeartbeat", HEARTBEAT_DESCRIPTION, true),
        |args, ctx| {
            let section = args.get_str("section")?;
            let old = args.get_str("oldContent")?;
            let new = args.get_str("newContent")?;
            let heartbeat = args.get_bool("requestHeartbeat")?;

            let message = if ctx.memory.replace(section, old, new)? {
                format!("Updated core memory section '{section}'.")
            } else {
                format!("No occurrence of the given text in core memory section '{section}'; nothing changed.")
            };
            Ok(ToolOutput::text(message).with_heartbeat(heartbeat))
        },
    ))
}

/// Create the `pauseHeartbeats` tool: stops the loop after this round.
pub fn pause_heartbeats_tool() -> Arc<dyn Tool> {
    Arc::new(FunctionTool::new(
        ToolSpec::new(
            PAUSE_HEARTBEATS,
            "Stop taking further steps until the user sends a new message.",
        ),
        |_args, _ctx| Ok(ToolOutput::text("Heartbeats paused.").with_heartbeat(false)),
    ))
}

/// Degrees Celsius for a handful of known locations.
pub fn weather_for(location: &str) -> f32 {
    match location {
        "San Francisco, CA" => 24.0,
        "Boston, MA" => 10.0,
        "New York City, NY" => 8.0,
        _ => 5.0,
    }
}

/// Create the `getWeather` demo tool.
pub fn weather_tool() -> Arc<dyn Tool> {
    Arc::new(FunctionTool::new(
        ToolSpec::new(
            GET_WEATHER,
            "A function that returns the weather (in degrees Celsius) for a given location.",
        )
        .string(
            "location",
            "The geographic location to check the weather for, formatted as \"<CITY_NAME>, <STATE>\". \
             For example, to check the weather in Boston, Massachusetts, this parameter would be \"Boston, MA\".",
            true,
        ),
        |args, _ctx| Ok(ToolOutput::value(weather_for(args.get_str("location")?))),
    ))
}

/// The memory and heartbeat tools.
pub fn memory_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        core_memory_append_tool(),
        core_memory_replace_tool(),
        pause_heartbeats_tool(),
    ]
}

/// Every built-in tool, memory tools first.
pub fn all_tools() -> Vec<Arc<dyn Tool>> {
    let mut tools = memory_tools();
    tools.push(weather_tool());
    tools
}
