//! Configuration for the simulated server.
//!
//! Loaded from a TOML file. A missing file is created with the defaults, and
//! any missing section or field falls back to its default.

use crate::cli::CliArgs;
use cool_events::Position;
use plugin_cool::CoolConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Default tick interval: 20 ticks per second.
fn default_tick_interval() -> u64 {
    50
}

fn default_spawn() -> Position {
    Position::new(0.0, 64.0, 0.0)
}

fn default_log_level() -> String {
    "info".to_string()
}

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub plugins: PluginSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Milliseconds between ticks in interactive mode
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Where players appear when `join` gives no position
    #[serde(default = "default_spawn")]
    pub spawn: Position,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            spawn: default_spawn(),
        }
    }
}

/// Per-plugin sections, keyed by plugin name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginSettings {
    #[serde(default)]
    pub cool: CoolConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path`, writing the defaults there first if
    /// the file does not exist.
    pub async fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Applies command-line overrides on top of the loaded file.
    pub fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
        }

        if args.json_logs {
            self.logging.json_format = true;
        }

        if let Some(tick_ms) = args.tick_ms {
            self.server.tick_interval_ms = tick_ms;
        }
    }

    /// Plugin sections in the JSON form handed to plugins.
    pub fn plugin_configs(&self) -> HashMap<String, serde_json::Value> {
        let mut configs = HashMap::new();
        match serde_json::to_value(&self.plugins.cool) {
            Ok(value) => {
                configs.insert(plugin_cool::PLUGIN_NAME.to_string(), value);
            }
            Err(e) => tracing::warn!("Could not encode plugins.cool: {}", e),
        }
        configs
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.tick_interval_ms == 0 {
            return Err("Tick interval must be greater than 0".to_string());
        }

        let valid_levels = VALID_LOG_LEVELS;
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        self.plugins
            .cool
            .validate()
            .map_err(|e| format!("Invalid plugins.cool: {}", e))?;

        Ok(())
    }
}
