//! Configuration loading from TOML files.

use serde::Deserialize;
use std::path::Path;

use crate::domain::{DqpThresholds, ScoringConfig};
use crate::error::{ConfigError, Result};

/// Engine configuration.
///
/// Every field has a deployed default; an empty file (or no file at all)
/// yields the same engines the defaults do. Threshold overrides sourced
/// from the limit store at runtime take precedence over the `[dqp]`
/// section for classification.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub dqp: DqpThresholds,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate band ordering across both engines.
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        self.dqp.validate()?;
        Ok(())
    }
}
