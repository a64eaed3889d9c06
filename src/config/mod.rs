//! Configuration (layered: defaults < config file < env < code).

use std::path::{Path, PathBuf};

use bon::Builder;
use serde::Deserialize;

use crate::agent_loop::limits::{parse_positive_usize, DEFAULT_MAX_ROUNDS};
use crate::agent_loop::RunnerLimits;
use crate::error::{HeartloopError, Result};
use crate::types::{GenerationSettings, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";
pub const MODEL_ENV: &str = "HEARTLOOP_MODEL";
pub const MAX_TOKENS_ENV: &str = "HEARTLOOP_MAX_TOKENS";
pub const TEMPERATURE_ENV: &str = "HEARTLOOP_TEMPERATURE";
pub const MAX_ROUNDS_ENV: &str = crate::agent_loop::limits::MAX_ROUNDS_ENV;

/// Resolved settings for one agent.
///
/// Build it in code with [`AgentConfig::builder`], or resolve it from the
/// environment and config file with [`AgentConfig::load`]. Values set in
/// code after loading win over everything else.
#[derive(Clone, Builder, PartialEq)]
pub struct AgentConfig {
    #[builder(into)]
    pub api_key: Option<String>,
    #[builder(into)]
    pub base_url: Option<String>,
    #[builder(into, default = DEFAULT_MODEL.to_string())]
    pub model: String,
    #[builder(default = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,
    #[builder(default = 0.0)]
    pub temperature: f32,
    #[builder(default = DEFAULT_MAX_ROUNDS)]
    pub max_rounds: usize,
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("max_rounds", &self.max_rounds)
            .finish()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// On-disk TOML layout. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub max_rounds: Option<usize>,
}

impl FileConfig {
    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw)
            .map_err(|e| HeartloopError::Configuration(format!("invalid config file: {e}")))
    }
}

impl AgentConfig {
    /// `$CONFIG_DIR/heartloop/config.toml`, when a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("heartloop").join("config.toml"))
    }

    /// Resolve defaults, then the config file, then the environment.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();

        let file = match path {
            Some(path) => Some(read_file_config(path)?),
            None => match Self::default_path() {
                Some(path) if path.exists() => Some(read_file_config(&path)?),
                _ => None,
            },
        };
        if let Some(file) = file {
            config.apply_file(file)?;
        }

        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults overridden by the environment only.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_file(&mut self, file: FileConfig) -> Result<()> {
        if let Some(key) = file.api_key {
            self.api_key = Some(key);
        }
        if let Some(url) = file.base_url {
            self.base_url = Some(url);
        }
        if let Some(model) = file.model {
            self.model = model;
        }
        if let Some(max_tokens) = file.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = file.temperature {
            self.temperature = temperature;
        }
        if let Some(max_rounds) = file.max_rounds {
            self.max_rounds = max_rounds;
        }
        self.validate()
    }

    /// Apply environment overrides read through `lookup`. Empty values are
    /// treated as unset.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = get(BASE_URL_ENV) {
            self.base_url = Some(url);
        }
        if let Some(model) = get(MODEL_ENV) {
            self.model = model.trim().to_string();
        }
        if let Some(raw) = get(MAX_TOKENS_ENV) {
            self.max_tokens = raw.trim().parse().map_err(|_| invalid_env(MAX_TOKENS_ENV, &raw))?;
        }
        if let Some(raw) = get(TEMPERATURE_ENV) {
            self.temperature = raw
                .trim()
                .parse()
                .map_err(|_| invalid_env(TEMPERATURE_ENV, &raw))?;
        }
        if let Some(raw) = get(MAX_ROUNDS_ENV) {
            self.max_rounds =
                parse_positive_usize(&raw).ok_or_else(|| invalid_env(MAX_ROUNDS_ENV, &raw))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(HeartloopError::Configuration("model must not be empty".into()));
        }
        if self.max_tokens == 0 {
            return Err(HeartloopError::Configuration("max_tokens must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(HeartloopError::Configuration(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            )));
        }
        if self.max_rounds == 0 {
            return Err(HeartloopError::Configuration("max_rounds must be positive".into()));
        }
        Ok(())
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings::builder()
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
    }

    pub fn limits(&self) -> RunnerLimits {
        RunnerLimits::new(self.max_rounds)
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)?;
    FileConfig::parse(&raw).map_err(|err| match err {
        HeartloopError::Configuration(msg) => {
            HeartloopError::Configuration(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

fn invalid_env(key: &str, value: &str) -> HeartloopError {
    HeartloopError::Configuration(format!("invalid value for {key}: '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_rounds, 20);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn env_overrides_defaults() {
        let mut config = AgentConfig::default();
        config
            .apply_env_from(env(&[
                (API_KEY_ENV, "sk-env"),
                (MODEL_ENV, "claude-3-5-sonnet-latest"),
                (MAX_TOKENS_ENV, "2048"),
                (TEMPERATURE_ENV, "0.5"),
                (MAX_ROUNDS_ENV, "4"),
            ]))
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.model, "claude-3-5-sonnet-latest");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.limits().max_rounds, 4);
    }

    #[test]
    fn invalid_env_number_is_configuration_error() {
        let mut config = AgentConfig::default();
        let err = config
            .apply_env_from(env(&[(MAX_ROUNDS_ENV, "zero")]))
            .unwrap_err();
        assert!(matches!(err, HeartloopError::Configuration(ref m) if m.contains(MAX_ROUNDS_ENV)));

        let err = config
            .apply_env_from(env(&[(TEMPERATURE_ENV, "1.7")]))
            .unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = AgentConfig::default();
        config.apply_env_from(env(&[(MODEL_ENV, "  ")])).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn file_layer_then_env_layer() {
        let mut config = AgentConfig::default();
        let file = FileConfig::parse("model = \"from-file\"\nmax_rounds = 7\n").unwrap();
        config.apply_file(file).unwrap();
        config.apply_env_from(env(&[(MODEL_ENV, "from-env")])).unwrap();

        assert_eq!(config.model, "from-env");
        assert_eq!(config.max_rounds, 7);
    }

    #[test]
    fn unknown_file_key_is_rejected() {
        assert!(FileConfig::parse("modle = \"typo\"").is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AgentConfig::builder().api_key("sk-secret".to_string()).build();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
