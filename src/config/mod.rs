//! Configuration management for the quest service.
//!
//! TOML-backed, with sensible defaults for every value so a bare
//! `questcycle init` produces a runnable setup. Sections:
//!
//! - [`ServerConfig`] - identity and data directory
//! - [`QuestConfig`] - pool file location and rollover polling cadence
//! - [`LoggingConfig`] - log level

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Display name used in logs and banners.
    pub name: String,
    /// Root directory for the sled store and generated data files.
    pub data_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "QuestCycle".to_string(),
            data_dir: "data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestConfig {
    /// JSON file holding the objective template pools. Created with defaults
    /// on first run when missing.
    #[serde(default = "default_pools_path")]
    pub pools_path: String,
    /// Server ticks between rollover checks.
    #[serde(default = "default_check_interval_ticks")]
    pub check_interval_ticks: u64,
    /// Seconds between polls when running the standalone watcher binary.
    #[serde(default = "default_watch_poll_seconds")]
    pub watch_poll_seconds: u64,
}

fn default_pools_path() -> String {
    "data/quest_pools.json".to_string()
}

fn default_check_interval_ticks() -> u64 {
    crate::quest::scheduler::DEFAULT_CHECK_INTERVAL_TICKS
}

fn default_watch_poll_seconds() -> u64 {
    1
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            pools_path: default_pools_path(),
            check_interval_ticks: default_check_interval_ticks(),
            watch_poll_seconds: default_watch_poll_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of: error, warn, info, debug, trace.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub quests: QuestConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Write a default configuration file.
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.data_dir.trim().is_empty() {
            return Err(anyhow!("server.data_dir must not be empty"));
        }
        if self.quests.pools_path.trim().is_empty() {
            return Err(anyhow!("quests.pools_path must not be empty"));
        }
        if self.quests.check_interval_ticks == 0 {
            return Err(anyhow!("quests.check_interval_ticks must be at least 1"));
        }
        if self.quests.watch_poll_seconds == 0 {
            return Err(anyhow!("quests.watch_poll_seconds must be at least 1"));
        }
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            other => Err(anyhow!("unknown logging.level '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().expect("defaults valid");
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = Config::default();
        config.quests.check_interval_ticks = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[server]\nname = \"Test\"\ndata_dir = \"d\"\n")
            .expect("parse");
        assert_eq!(config.server.name, "Test");
        assert_eq!(config.quests.check_interval_ticks, 20);
        assert_eq!(config.logging.level, "info");
    }
}
