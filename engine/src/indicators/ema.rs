// Exponential Moving Average (EMA) overlay on close prices
use super::moving_average::{self, MovingAverageConfig};
use super::{align, IndicatorCalculator};
use crate::error::Result;
use crate::models::BarSeries;
use serde_json::Value;
use shared::models::IndicatorSeries;

pub struct Ema {
    name: String,
    config: MovingAverageConfig,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self::with_config(MovingAverageConfig { period })
    }

    pub fn with_config(config: MovingAverageConfig) -> Self {
        Self {
            name: format!("EMA({})", config.period),
            config,
        }
    }
}

impl IndicatorCalculator for Ema {
    type Output = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.config.period })
    }

    /// One point per bar; the EMA has no warm-up window.
    fn calculate(&self, series: &BarSeries) -> Result<IndicatorSeries<f64>> {
        let values = moving_average::ema(&series.closes(), self.config.period)?;
        tracing::debug!(indicator = %self.name, bars = series.len(), "Calculated EMA");
        Ok(align(series, 0, values))
    }
}
