//! TOML-based engine configuration.
//!
//! Covers the two tunables with observable behavior differences:
//! - Week start convention for this-week/last-week window bounds
//! - Scan horizon for the consecutive-day streak walk
//!
//! Defaults are compiled in; an optional TOML file can override them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::dates::WeekStart;
use crate::error::ConfigError;
use crate::streak::DEFAULT_STREAK_HORIZON_DAYS;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Week start convention for week-bounded windows.
    #[serde(default)]
    pub week_start: WeekStart,

    /// Upper bound on the streak scan, in days. Must be at least 1.
    #[serde(default = "default_streak_horizon")]
    pub streak_horizon_days: u32,
}

fn default_streak_horizon() -> u32 {
    DEFAULT_STREAK_HORIZON_DAYS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::default(),
            streak_horizon_days: default_streak_horizon(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.streak_horizon_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "streak_horizon_days".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
