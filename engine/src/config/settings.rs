// Indicator settings, loaded from a JSON file or taken from defaults
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{EngineError, Result};
use crate::indicators::{
    BandsConfig, MomentumConfig, MovingAverageConfig, StochasticConfig, TrendConfig,
};

/// Missing sections (or missing keys inside a section) fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma: MovingAverageConfig,
    pub ema: MovingAverageConfig,
    pub bollinger: BandsConfig,
    pub rsi: MomentumConfig,
    pub kd: StochasticConfig,
    pub macd: TrendConfig,
}

impl IndicatorSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let settings = Self::from_json(&contents)?;
        tracing::info!(path = %path.display(), "Loaded indicator settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.sma.validate()?;
        self.ema.validate()?;
        self.bollinger.validate()?;
        self.rsi.validate()?;
        self.kd.validate()?;
        self.macd.validate()
    }
}
