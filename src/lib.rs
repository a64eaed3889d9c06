//! heartloop: a minimal heartbeat-driven LLM agent loop.
//!
//! Each round sends the conversation, the registered tools and the rendered
//! core memory to the model, executes every tool the model asks for, and
//! feeds the results back. The loop keeps going while tools keep the
//! heartbeat alive.
//!
//! # Quick Start
//!
//! ```no_run
//! use heartloop::prelude::*;
//!
//! # async fn example() -> heartloop::error::Result<()> {
//! let config = AgentConfig::load(None)?;
//! let mut tools = ToolRegistry::new();
//! for tool in heartloop::tools::builtin::all_tools() {
//!     tools.register_arc(tool)?;
//! }
//! let state = AgentState::builder().tools(tools).build();
//!
//! let mut agent = Agent::from_config(&config, state)?;
//! let result = agent.run("What is the weather in Boston, MA?").await?;
//! println!("{}", result.output);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod agent_loop;
pub mod config;
pub mod error;
pub mod memory;
pub mod prelude;
pub mod provider;
pub mod session;
pub mod tools;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
