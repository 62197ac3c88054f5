//! Configuration management for Symbio CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use symbio::prelude::SymbioConfig;

pub const CONFIG_FILE: &str = "symbio.toml";

/// Symbio project configuration.
///
/// The loop sections (`[field]`, `[swarm]`, ...) sit at the top level of
/// `symbio.toml`; `[project]` holds the CLI's own settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(flatten)]
    pub symbio: SymbioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Where the trained cortex lives, relative to the data directory.
    #[serde(default = "default_model_dir")]
    pub model_dir: String,
}

fn default_model_dir() -> String { "model".to_string() }

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
        }
    }
}

impl Config {
    /// Load config from symbio.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        let config = if let Some(path) = find_config_file() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        } else {
            Config::default()
        };
        config.symbio.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Directory holding the trained cortex.
    pub fn model_path(&self) -> Result<PathBuf> {
        Ok(data_dir()?.join(&self.project.model_dir))
    }
}

/// Find symbio.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Get the Symbio data directory (.symbio/).
pub fn data_dir() -> Result<PathBuf> {
    let dir = std::env::current_dir()?.join(".symbio");
    Ok(dir)
}

/// Get the directory for saved run records.
pub fn runs_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("runs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(content.contains("[field]"));
        assert!(content.contains("[project]"));
        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed.symbio, SymbioConfig::default());
        assert_eq!(parsed.project.model_dir, "model");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str("[swarm]\nn_agents = 4\nboundary = \"periodic\"\n").unwrap();
        assert_eq!(parsed.symbio.swarm.n_agents, 4);
        assert_eq!(parsed.symbio.field.height, 64);
        assert_eq!(parsed.project.model_dir, "model");
    }
}
