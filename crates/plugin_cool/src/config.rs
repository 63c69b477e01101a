//! Plugin settings, read from the host's `[plugins.cool]` section.

use cool_events::PluginError;
use serde::{Deserialize, Serialize};
use teleport_requests::{Tick, DEFAULT_EXPIRY_TICKS};

/// All tunables of the plugin. Every field has a default, so an empty or
/// partial section is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoolConfig {
    pub teleport: TeleportSettings,
    pub effects: EffectSettings,
    pub stats: StatsSettings,
    pub speed: SpeedSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportSettings {
    /// Ticks before an unanswered /tpa request expires
    pub expiry_ticks: Tick,
}

impl Default for TeleportSettings {
    fn default() -> Self {
        Self {
            expiry_ticks: DEFAULT_EXPIRY_TICKS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSettings {
    /// Ticks between ambient particle rounds
    pub ambient_interval_ticks: u64,
    /// Each player gets an ambient particle with probability 1 / ambient_chance
    pub ambient_chance: u32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            ambient_interval_ticks: 60,
            ambient_chance: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSettings {
    /// Blocks broken between milestone celebrations
    pub milestone_interval: u32,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            milestone_interval: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedSettings {
    /// Highest level `/cool speed` accepts
    pub max_level: u32,
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self { max_level: 10 }
    }
}

impl CoolConfig {
    /// Reads the JSON form the host hands out and validates it.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PluginError> {
        let config: CoolConfig = serde_json::from_value(value)
            .map_err(|e| PluginError::InvalidConfig(e.to_string()))?;
        config.validate().map_err(PluginError::InvalidConfig)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.teleport.expiry_ticks == 0 {
            return Err("teleport.expiry_ticks must be greater than 0".to_string());
        }

        if self.effects.ambient_interval_ticks == 0 {
            return Err("effects.ambient_interval_ticks must be greater than 0".to_string());
        }

        if self.effects.ambient_chance == 0 {
            return Err("effects.ambient_chance must be at least 1".to_string());
        }

        if self.stats.milestone_interval == 0 {
            return Err("stats.milestone_interval must be greater than 0".to_string());
        }

        if self.speed.max_level == 0 {
            return Err("speed.max_level must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = CoolConfig::default();
        assert_eq!(config.teleport.expiry_ticks, 600);
        assert_eq!(config.effects.ambient_interval_ticks, 60);
        assert_eq!(config.effects.ambient_chance, 10);
        assert_eq!(config.stats.milestone_interval, 50);
        assert_eq!(config.speed.max_level, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_value_keeps_defaults() {
        let config = CoolConfig::from_value(json!({
            "teleport": { "expiry_ticks": 200 },
            "stats": {}
        }))
        .unwrap();

        assert_eq!(config.teleport.expiry_ticks, 200);
        assert_eq!(config.stats.milestone_interval, 50);
        assert_eq!(config.effects, EffectSettings::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let zero_expiry = CoolConfig::from_value(json!({ "teleport": { "expiry_ticks": 0 } }));
        assert!(matches!(zero_expiry, Err(PluginError::InvalidConfig(_))));

        let wrong_type = CoolConfig::from_value(json!({ "speed": { "max_level": "fast" } }));
        assert!(matches!(wrong_type, Err(PluginError::InvalidConfig(_))));

        let mut config = CoolConfig::default();
        config.effects.ambient_chance = 0;
        assert!(config.validate().unwrap_err().contains("ambient_chance"));
    }
}
