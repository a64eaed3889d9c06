//! Subcommand handlers.

use std::path::Path;

use tracing::{info, warn};

use super::{ChatArgs, MemoryArgs};
use crate::agent::AgentState;
use crate::agent_loop::{Agent, LoopExit};
use crate::config::AgentConfig;
use crate::error::{HeartloopError, Result};
use crate::memory::CoreMemory;
use crate::session::{FileSessionStore, SessionStore};
use crate::tools::{builtin, ToolRegistry};

/// Registry with every built-in tool.
pub fn default_registry() -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    for tool in builtin::all_tools() {
        registry.register_arc(tool)?;
    }
    Ok(registry)
}

/// Apply command-line overrides on top of the loaded config.
pub fn apply_overrides(config: &mut AgentConfig, args: &ChatArgs) -> Result<()> {
    if let Some(ref model) = args.model {
        config.model = model.clone();
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(max_rounds) = args.max_rounds {
        config.max_rounds = max_rounds;
    }
    config.validate()
}

pub async fn handle_chat(args: ChatArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = AgentConfig::load(config_path)?;
    apply_overrides(&mut config, &args)?;

    let store = FileSessionStore::new_default();
    let tools = default_registry()?;
    let saved = match args.session {
        Some(ref name) => store.load(name)?,
        None => None,
    };
    let mut state = match saved {
        Some(snapshot) => {
            info!(session = args.session.as_deref(), "resuming session");
            AgentState::restore(snapshot, tools)?
        }
        None => AgentState::builder().tools(tools).build(),
    };
    if let Some(system) = args.system {
        state.persona = system;
    }

    let mut agent = Agent::from_config(&config, state)?;
    let result = agent.run(args.prompt).await?;

    if result.exit == LoopExit::RoundLimit {
        warn!(rounds = result.rounds, "stopped at the round limit");
    }
    println!("{}", result.output);

    if let Some(ref name) = args.session {
        store.save(name, &agent.state().snapshot())?;
    }
    Ok(())
}

pub fn handle_memory(args: MemoryArgs) -> Result<()> {
    let store = FileSessionStore::new_default();
    let snapshot = store.load(&args.session)?.ok_or_else(|| {
        HeartloopError::Configuration(format!("no saved session named '{}'", args.session))
    })?;
    let memory = CoreMemory::from_sections(snapshot.memory)?;
    print!("{}", memory.render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn chat_args(argv: &[&str]) -> ChatArgs {
        let mut full = vec!["heartloop", "chat"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Chat(args) => args,
            other => panic!("expected Chat, got {other:?}"),
        }
    }

    #[test]
    fn default_registry_has_builtins_in_order() {
        let registry = default_registry().unwrap();
        let names: Vec<_> = registry.describe_all().iter().map(|s| s.name.clone()).collect();
        assert_eq!(
            names,
            ["coreMemoryAppend", "coreMemoryReplace", "pauseHeartbeats", "getWeather"]
        );
    }

    #[test]
    fn overrides_win_over_config() {
        let mut config = AgentConfig::default();
        apply_overrides(
            &mut config,
            &chat_args(&["-m", "claude-x", "--max-rounds", "3", "-t", "0.2", "hi"]),
        )
        .unwrap();
        assert_eq!(config.model, "claude-x");
        assert_eq!(config.max_rounds, 3);
        assert_eq!(config.temperature, 0.2);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let mut config = AgentConfig::default();
        let err = apply_overrides(&mut config, &chat_args(&["--max-rounds", "0", "hi"])).unwrap_err();
        assert!(matches!(err, HeartloopError::Configuration(_)));
    }
}
