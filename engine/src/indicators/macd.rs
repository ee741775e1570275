// MACD-style trend oscillator: fast/slow EMA difference, its EMA signal line and the histogram
use super::moving_average::ema;
use super::{align, validate_period, IndicatorCalculator};
use crate::error::Result;
use crate::models::BarSeries;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::IndicatorSeries;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self { fast: 12, slow: 26, signal: 9 }
    }
}

impl TrendConfig {
    pub fn validate(&self) -> Result<()> {
        validate_period("fast period", self.fast)?;
        validate_period("slow period", self.slow)?;
        validate_period("signal period", self.signal)
    }
}

/// Bar colouring hint for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramTrend {
    Positive,
    Negative,
}

impl HistogramTrend {
    pub fn of(histogram: f64) -> Self {
        if histogram >= 0.0 {
            HistogramTrend::Positive
        } else {
            HistogramTrend::Negative
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub line: f64,
    pub signal_line: f64,
    pub histogram: f64,
    pub trend: HistogramTrend,
}

/// One point per close. Early values are emitted even though the slow EMA has not
/// converged yet; gating them would change the numbers downstream consumers expect.
pub fn macd_values(closes: &[f64], config: &TrendConfig) -> Result<Vec<MacdPoint>> {
    config.validate()?;
    let fast = ema(closes, config.fast)?;
    let slow = ema(closes, config.slow)?;
    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema(&line, config.signal)?;

    Ok(line
        .iter()
        .zip(&signal)
        .map(|(&line, &signal_line)| {
            let histogram = line - signal_line;
            MacdPoint {
                line,
                signal_line,
                histogram,
                trend: HistogramTrend::of(histogram),
            }
        })
        .collect())
}

pub struct Macd {
    name: String,
    config: TrendConfig,
}

impl Macd {
    pub fn new(config: TrendConfig) -> Self {
        Self {
            name: format!("MACD({},{},{})", config.fast, config.slow, config.signal),
            config,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(TrendConfig::default())
    }
}

impl IndicatorCalculator for Macd {
    type Output = MacdPoint;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "fast": self.config.fast,
            "slow": self.config.slow,
            "signal": self.config.signal,
        })
    }

    fn calculate(&self, series: &BarSeries) -> Result<IndicatorSeries<MacdPoint>> {
        let points = macd_values(&series.closes(), &self.config)?;
        tracing::debug!(indicator = %self.name, bars = series.len(), "Calculated MACD");
        Ok(align(series, 0, points))
    }
}
