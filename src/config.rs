use std::net::IpAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::command::CommandSpec;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9835
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

/// Argv overrides for the two external queries. Deployments use these to
/// wrap the tools (sudo, remote shims); tests point them at `sh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "CommandSpec::docker_stats")]
    pub docker_stats: CommandSpec,
    #[serde(default = "CommandSpec::nvidia_smi")]
    pub nvidia_smi: CommandSpec,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            docker_stats: CommandSpec::docker_stats(),
            nvidia_smi: CommandSpec::nvidia_smi(),
        }
    }
}

/// Loads config from file; a missing file yields the built-in defaults.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        info!(path = %path.display(), "No config file found, using defaults");
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    config.server.bind.parse::<IpAddr>().map_err(|_| {
        ConfigError::Invalid(format!("Invalid bind address: {}", config.server.bind))
    })?;

    for (name, spec) in [
        ("docker_stats", &config.sources.docker_stats),
        ("nvidia_smi", &config.sources.nvidia_smi),
    ] {
        if spec.program.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "Source '{}' has empty program",
                name
            )));
        }
    }

    Ok(())
}
