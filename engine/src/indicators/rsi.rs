// Relative Strength Index (RSI) with Wilder smoothing and level-based signals
use super::{align, require_len, seeded_len, validate_period, IndicatorCalculator};
use crate::error::{EngineError, Result};
use crate::models::BarSeries;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{IndicatorSeries, Signal};

/// Oversold / overbought levels. A reading is classified on its level alone, no crossing required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self { oversold: 30.0, overbought: 70.0 }
    }
}

impl SignalThresholds {
    pub fn classify(&self, value: f64) -> Signal {
        if value < self.oversold {
            Signal::Buy
        } else if value > self.overbought {
            Signal::Sell
        } else {
            Signal::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        let thresholds = SignalThresholds::default();
        Self {
            period: 14,
            oversold: thresholds.oversold,
            overbought: thresholds.overbought,
        }
    }
}

impl MomentumConfig {
    pub fn validate(&self) -> Result<()> {
        validate_period("period", self.period)?;
        let levels_ok = (0.0..=100.0).contains(&self.oversold)
            && (0.0..=100.0).contains(&self.overbought)
            && self.oversold < self.overbought;
        if !levels_ok {
            return Err(EngineError::InvalidConfiguration(format!(
                "thresholds must satisfy 0 <= oversold < overbought <= 100, got {} / {}",
                self.oversold, self.overbought
            )));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> SignalThresholds {
        SignalThresholds {
            oversold: self.oversold,
            overbought: self.overbought,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumPoint {
    pub value: f64,
    pub signal: Signal,
}

/// `100 - 100 / (1 + gain/loss)`, pinned to exactly 100 when there were no losses.
pub(crate) fn relative_strength(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Splits close-to-close changes into (gain, loss) pairs, both non-negative.
pub(crate) fn gains_and_losses(closes: &[f64]) -> Vec<(f64, f64)> {
    closes
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            let gain = if change > 0.0 { change } else { 0.0 };
            let loss = if change < 0.0 { -change } else { 0.0 };
            (gain, loss)
        })
        .collect()
}

/// Simple means of the first `period` gains and losses.
pub(crate) fn seed_averages(moves: &[(f64, f64)], period: usize) -> (f64, f64) {
    let seed = &moves[..period];
    let gains = seed.iter().map(|(g, _)| g).sum::<f64>();
    let losses = seed.iter().map(|(_, l)| l).sum::<f64>();
    (gains / period as f64, losses / period as f64)
}

/// Wilder RSI readings. The seed consumes the first `period` changes and is not itself
/// emitted, so element `j` belongs to `closes[j + period + 1]` and the output has
/// `closes.len() - period - 1` elements.
pub fn rsi_values(closes: &[f64], period: usize) -> Result<Vec<f64>> {
    validate_period("period", period)?;
    require_len(closes.len(), seeded_len(period))?;

    let moves = gains_and_losses(closes);
    let (mut avg_gain, mut avg_loss) = seed_averages(&moves, period);

    let smoothing = (period - 1) as f64;
    let mut results = Vec::with_capacity(moves.len() - period);
    for &(gain, loss) in &moves[period..] {
        avg_gain = (avg_gain * smoothing + gain) / period as f64;
        avg_loss = (avg_loss * smoothing + loss) / period as f64;
        results.push(relative_strength(avg_gain, avg_loss));
    }
    Ok(results)
}

pub struct Rsi {
    name: String,
    config: MomentumConfig,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self::with_config(MomentumConfig { period, ..MomentumConfig::default() })
    }

    pub fn with_config(config: MomentumConfig) -> Self {
        Self {
            name: format!("RSI({})", config.period),
            config,
        }
    }
}

impl IndicatorCalculator for Rsi {
    type Output = MomentumPoint;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "period": self.config.period,
            "oversold": self.config.oversold,
            "overbought": self.config.overbought,
        })
    }

    fn calculate(&self, series: &BarSeries) -> Result<IndicatorSeries<MomentumPoint>> {
        self.config.validate()?;
        let thresholds = self.config.thresholds();
        let points: Vec<MomentumPoint> = rsi_values(&series.closes(), self.config.period)?
            .into_iter()
            .map(|value| MomentumPoint { value, signal: thresholds.classify(value) })
            .collect();
        tracing::debug!(
            indicator = %self.name,
            bars = series.len(),
            points = points.len(),
            "Calculated RSI"
        );
        Ok(align(series, seeded_len(self.config.period), points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Bar;

    // Wilder's 14-period worksheet as published by StockCharts.
    const REFERENCE_CLOSES: [f64; 33] = [
        44.3389, 44.0902, 44.1497, 43.6124, 44.3278, 44.8264, 45.0955, 45.4245, 45.8433, 46.0826,
        45.8931, 46.0328, 45.6140, 46.2820, 46.2820, 46.0028, 46.0328, 46.4116, 46.2222, 45.6439,
        46.2122, 46.2521, 45.7137, 46.4515, 45.7835, 45.3548, 44.0288, 44.1783, 44.2181, 44.5672,
        43.4205, 42.6628, 43.1314,
    ];

    // Readings for closes[15..]; the published table rounds these to two decimals.
    const REFERENCE_RSI: [f64; 18] = [
        66.31856180517232, 66.54982993552764, 69.40630533884433, 66.3551690562718,
        57.97485571430819, 62.929606754597, 63.25714756254528, 56.05929871526324,
        62.37707144318042, 54.70757308126129, 50.4227744114564, 39.989823145376604,
        41.46048197570564, 41.86891609254328, 45.46321244528675, 37.30404208985967,
        33.07952299438848, 37.77295211443486,
    ];

    fn create_bar(timestamp: i64, close: f64) -> Bar {
        Bar::new(timestamp, close, close, close, close)
    }

    fn series_from_closes(closes: &[f64]) -> BarSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| create_bar(i as i64, c))
            .collect();
        BarSeries::new(bars).unwrap()
    }

    #[test]
    fn test_rsi_matches_wilder_reference() {
        let values = rsi_values(&REFERENCE_CLOSES, 14).unwrap();
        assert_eq!(values.len(), REFERENCE_RSI.len());
        for (i, (actual, expected)) in values.iter().zip(REFERENCE_RSI.iter()).enumerate() {
            assert!(
                (actual - expected).abs() < 1e-6,
                "Mismatch at index {}: {} != {}",
                i,
                actual,
                expected
            );
        }
        // Spot-check against the rounded published table.
        assert!((values[0] - 66.32).abs() < 0.005);
        assert!((values[17] - 37.77).abs() < 0.005);
    }

    #[test]
    fn test_rsi_alignment() {
        let series = series_from_closes(&REFERENCE_CLOSES);
        let points = Rsi::new(14).calculate(&series).unwrap();
        assert_eq!(points.len(), REFERENCE_CLOSES.len() - 14 - 1);
        assert_eq!(points[0].timestamp, 15);
        assert_eq!(points.last().unwrap().timestamp, 32);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let err = rsi_values(&[1.0; 14], 14).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData { required: 15, actual: 14 }));
    }

    #[test]
    fn test_rsi_huge_period_is_insufficient_data() {
        let err = rsi_values(&[1.0, 2.0, 3.0], usize::MAX).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData { required: usize::MAX, actual: 3 }));

        let config = MomentumConfig { period: usize::MAX, ..MomentumConfig::default() };
        let series = series_from_closes(&REFERENCE_CLOSES);
        let err = Rsi::with_config(config).calculate(&series).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_rsi_exact_seed_length_yields_no_points() {
        assert!(rsi_values(&[1.0; 15], 14).unwrap().is_empty());
    }

    #[test]
    fn test_rsi_all_gains() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let values = rsi_values(&closes, 14).unwrap();
        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_rsi_all_losses() {
        let closes: Vec<f64> = (1..=20).map(|i| 20.0 - i as f64).collect();
        let values = rsi_values(&closes, 14).unwrap();
        assert!(values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rsi_flat_prices_pin_to_100() {
        let values = rsi_values(&[10.0; 20], 5).unwrap();
        assert!(values.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_signals_are_level_checks() {
        let thresholds = SignalThresholds::default();
        assert_eq!(thresholds.classify(29.99), Signal::Buy);
        assert_eq!(thresholds.classify(30.0), Signal::None);
        assert_eq!(thresholds.classify(70.0), Signal::None);
        assert_eq!(thresholds.classify(70.01), Signal::Sell);

        // Every reading of a steadily rising series is overbought, not just the first.
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let points = Rsi::new(14).calculate(&series_from_closes(&closes)).unwrap();
        assert!(points.iter().all(|p| p.value.signal == Signal::Sell));
    }

    #[test]
    fn test_invalid_thresholds() {
        let config = MomentumConfig {
            oversold: 80.0,
            overbought: 20.0,
            ..MomentumConfig::default()
        };
        let series = series_from_closes(&REFERENCE_CLOSES);
        let err = Rsi::with_config(config).calculate(&series).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }
}
