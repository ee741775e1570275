// Bollinger-style volatility bands: SMA +/- multiplier * population standard deviation
use super::moving_average::sma;
use super::{align, require_len, validate_period, IndicatorCalculator};
use crate::error::{EngineError, Result};
use crate::models::BarSeries;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::IndicatorSeries;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandsConfig {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for BandsConfig {
    fn default() -> Self {
        Self { period: 20, multiplier: 2.0 }
    }
}

impl BandsConfig {
    pub fn validate(&self) -> Result<()> {
        validate_period("period", self.period)?;
        if !(self.multiplier.is_finite() && self.multiplier > 0.0) {
            return Err(EngineError::InvalidConfiguration(format!(
                "multiplier must be a positive number, got {}",
                self.multiplier
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// Close of the bar the bands were computed for.
    pub price: f64,
}

/// Bands for every close from index `period - 1` on; element `j` belongs to
/// `closes[j + period - 1]`.
pub fn bollinger_bands(closes: &[f64], config: &BandsConfig) -> Result<Vec<BandPoint>> {
    config.validate()?;
    require_len(closes.len(), config.period)?;

    let period = config.period;
    let means = sma(closes, period)?;
    let bands = means
        .iter()
        .enumerate()
        .filter_map(|(i, mean)| mean.map(|mean| (i, mean)))
        .map(|(i, middle)| {
            let window = &closes[i + 1 - period..=i];
            let variance = window
                .iter()
                .map(|price| {
                    let diff = price - middle;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            let width = config.multiplier * variance.sqrt();
            BandPoint {
                upper: middle + width,
                middle,
                lower: middle - width,
                price: closes[i],
            }
        })
        .collect();
    Ok(bands)
}

pub struct BollingerBands {
    name: String,
    config: BandsConfig,
}

impl BollingerBands {
    pub fn new(config: BandsConfig) -> Self {
        Self {
            name: format!("BOLL({},{})", config.period, config.multiplier),
            config,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new(BandsConfig::default())
    }
}

impl IndicatorCalculator for BollingerBands {
    type Output = BandPoint;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.config.period, "multiplier": self.config.multiplier })
    }

    fn calculate(&self, series: &BarSeries) -> Result<IndicatorSeries<BandPoint>> {
        let bands = bollinger_bands(&series.closes(), &self.config)?;
        tracing::debug!(
            indicator = %self.name,
            bars = series.len(),
            points = bands.len(),
            "Calculated Bollinger bands"
        );
        Ok(align(series, self.config.period - 1, bands))
    }
}
