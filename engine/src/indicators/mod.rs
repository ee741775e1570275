// Technical indicators module
pub mod bollinger;
pub mod ema;
pub mod kd;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod sma;

pub use bollinger::{BandPoint, BandsConfig, BollingerBands};
pub use ema::Ema;
pub use kd::{KdPoint, Stochastic, StochasticConfig};
pub use macd::{HistogramTrend, Macd, MacdPoint, TrendConfig};
pub use moving_average::MovingAverageConfig;
pub use rsi::{MomentumConfig, MomentumPoint, Rsi, SignalThresholds};
pub use sma::Sma;

use serde::Serialize;
use serde_json::Value;
use shared::models::{IndicatorPoint, IndicatorSeries};

use crate::error::{EngineError, Result};
use crate::models::BarSeries;

/// Common trait for all indicators.
///
/// `calculate` returns one point per bar for which the indicator is defined, so the
/// series length is `series.len() - warm-up` and every point carries its bar's timestamp.
pub trait IndicatorCalculator: Send + Sync {
    type Output: Serialize;

    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, series: &BarSeries) -> Result<IndicatorSeries<Self::Output>>;
}

pub(crate) fn validate_period(field: &str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(EngineError::InvalidConfiguration(format!(
            "{} must be greater than 0",
            field
        )));
    }
    Ok(())
}

/// Closes needed to seed an indicator built on `period` close-to-close changes.
pub(crate) fn seeded_len(period: usize) -> usize {
    period.saturating_add(1)
}

pub(crate) fn require_len(actual: usize, required: usize) -> Result<()> {
    if actual < required {
        return Err(EngineError::InsufficientData { required, actual });
    }
    Ok(())
}

/// Pairs `values[j]` with the bar at `warm_up + j`.
pub(crate) fn align<T>(series: &BarSeries, warm_up: usize, values: Vec<T>) -> IndicatorSeries<T> {
    series
        .bars()
        .iter()
        .skip(warm_up)
        .zip(values)
        .map(|(bar, value)| IndicatorPoint::new(bar.timestamp, value))
        .collect()
}
