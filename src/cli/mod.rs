//! CLI entry point for heartloop.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// heartloop agent CLI
#[derive(Parser, Debug)]
#[command(name = "heartloop", version, about = "A heartbeat-driven LLM agent loop")]
pub struct Cli {
    /// Config file (defaults to $CONFIG_DIR/heartloop/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a prompt and run the agent loop until it stops
    Chat(ChatArgs),
    /// Print the core memory of a saved session
    Memory(MemoryArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Model id (overrides config and HEARTLOOP_MODEL)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Persona / system preamble
    #[arg(short, long)]
    pub system: Option<String>,

    /// Maximum rounds for this run
    #[arg(long)]
    pub max_rounds: Option<usize>,

    /// Temperature (0.0 - 1.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Max tokens per response
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Resume and save this named session
    #[arg(long)]
    pub session: Option<String>,

    /// User prompt
    pub prompt: String,
}

/// Arguments for the `memory` subcommand.
#[derive(Parser, Debug)]
pub struct MemoryArgs {
    /// Session name
    #[arg(long)]
    pub session: String,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
