// Simple Moving Average (SMA) overlay on close prices
use super::moving_average::{self, MovingAverageConfig};
use super::{align, require_len, IndicatorCalculator};
use crate::error::Result;
use crate::models::BarSeries;
use serde_json::Value;
use shared::models::IndicatorSeries;

pub struct Sma {
    name: String,
    config: MovingAverageConfig,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self::with_config(MovingAverageConfig { period })
    }

    pub fn with_config(config: MovingAverageConfig) -> Self {
        Self {
            name: format!("SMA({})", config.period),
            config,
        }
    }
}

impl IndicatorCalculator for Sma {
    type Output = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.config.period })
    }

    fn calculate(&self, series: &BarSeries) -> Result<IndicatorSeries<f64>> {
        self.config.validate()?;
        require_len(series.len(), self.config.period)?;

        let values: Vec<f64> = moving_average::sma(&series.closes(), self.config.period)?
            .into_iter()
            .flatten()
            .collect();
        tracing::debug!(
            indicator = %self.name,
            bars = series.len(),
            points = values.len(),
            "Calculated SMA"
        );
        Ok(align(series, self.config.period - 1, values))
    }
}
