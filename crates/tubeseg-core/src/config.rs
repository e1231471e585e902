//! Service configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CoreError;
use crate::Result;

/// Names a JSON config file to load instead of the defaults
pub const CONFIG_ENV: &str = "TUBESEG_CONFIG";
/// Overrides `log_filter`
pub const LOG_ENV: &str = "TUBESEG_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Smallest accepted `scale / scaleNorm`. Below this the engine would be
    /// asked to trace at a sub-voxel radius.
    pub min_scale_ratio: f64,
    /// Debug tracing flag passed to the engine at load and on every extraction
    pub extraction_debug: bool,
    /// Seed argument passed unchanged to every extraction
    pub seed_tube_id: u64,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the file named by `TUBESEG_CONFIG`, with `TUBESEG_LOG`
    /// applied on top.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Ok(filter) = std::env::var(LOG_ENV) {
            config.log_filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_scale_ratio.is_finite() || self.min_scale_ratio <= 0.0 {
            return Err(CoreError::Config(format!(
                "min_scale_ratio must be a positive number, got {}",
                self.min_scale_ratio
            )));
        }
        if self.log_filter.trim().is_empty() {
            return Err(CoreError::Config("log_filter cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_scale_ratio: 0.3,
            extraction_debug: true,
            seed_tube_id: 0,
            log_filter: "info".to_string(),
        }
    }
}
