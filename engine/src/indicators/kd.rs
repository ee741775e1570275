// Stochastic (KD) oscillator: RSV over a rolling high/low range, smoothed into %K and %D
use super::{align, require_len, validate_period, IndicatorCalculator};
use crate::error::{EngineError, Result};
use crate::models::BarSeries;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::IndicatorSeries;
use std::collections::VecDeque;

const NEUTRAL: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticConfig {
    pub period: usize,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl StochasticConfig {
    pub fn validate(&self) -> Result<()> {
        validate_period("period", self.period)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KdPoint {
    pub k: f64,
    pub d: f64,
}

#[derive(Debug, Clone, Copy)]
enum Extreme {
    Min,
    Max,
}

/// Rolling min or max over the last `window` pushes, amortised O(1) per push.
struct RollingExtreme {
    window: usize,
    extreme: Extreme,
    deque: VecDeque<(usize, f64)>,
}

impl RollingExtreme {
    fn new(window: usize, extreme: Extreme) -> Self {
        Self {
            window,
            extreme,
            deque: VecDeque::with_capacity(window + 1),
        }
    }

    fn push(&mut self, index: usize, value: f64) -> f64 {
        while let Some(&(_, back)) = self.deque.back() {
            let dominated = match self.extreme {
                Extreme::Min => back >= value,
                Extreme::Max => back <= value,
            };
            if !dominated {
                break;
            }
            self.deque.pop_back();
        }
        self.deque.push_back((index, value));
        while let Some(&(front, _)) = self.deque.front() {
            if front + self.window > index {
                break;
            }
            self.deque.pop_front();
        }
        // The value just pushed is always in the deque.
        self.deque.front().map_or(value, |&(_, v)| v)
    }
}

/// %K / %D for every bar from index `period - 1` on. The three projections must be
/// the same length.
///
/// A window whose highest high equals its lowest low has no range; its RSV is taken
/// as 50.
pub fn stochastic_values(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    config: &StochasticConfig,
) -> Result<Vec<KdPoint>> {
    config.validate()?;
    if highs.len() != lows.len() || lows.len() != closes.len() {
        return Err(EngineError::InvalidConfiguration(format!(
            "highs, lows and closes must have equal length, got {} / {} / {}",
            highs.len(),
            lows.len(),
            closes.len()
        )));
    }
    require_len(closes.len(), config.period)?;

    let mut rolling_low = RollingExtreme::new(config.period, Extreme::Min);
    let mut rolling_high = RollingExtreme::new(config.period, Extreme::Max);
    let mut prev_k = NEUTRAL;
    let mut prev_d = NEUTRAL;
    let mut results = Vec::with_capacity(closes.len() + 1 - config.period);

    for (i, ((&high, &low), &close)) in highs.iter().zip(lows).zip(closes).enumerate() {
        let lowest_low = rolling_low.push(i, low);
        let highest_high = rolling_high.push(i, high);
        if i + 1 < config.period {
            continue;
        }

        let rsv = if highest_high == lowest_low {
            tracing::trace!(
                index = i,
                price = highest_high,
                "Zero-range stochastic window, using neutral RSV"
            );
            NEUTRAL
        } else {
            (close - lowest_low) / (highest_high - lowest_low) * 100.0
        };

        let k = (2.0 / 3.0) * prev_k + (1.0 / 3.0) * rsv;
        let d = (2.0 / 3.0) * prev_d + (1.0 / 3.0) * k;
        results.push(KdPoint { k, d });
        prev_k = k;
        prev_d = d;
    }
    Ok(results)
}

pub struct Stochastic {
    name: String,
    config: StochasticConfig,
}

impl Stochastic {
    pub fn new(config: StochasticConfig) -> Self {
        Self {
            name: format!("KD({})", config.period),
            config,
        }
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new(StochasticConfig::default())
    }
}

impl IndicatorCalculator for Stochastic {
    type Output = KdPoint;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.config.period })
    }

    fn calculate(&self, series: &BarSeries) -> Result<IndicatorSeries<KdPoint>> {
        let points = stochastic_values(
            &series.highs(),
            &series.lows(),
            &series.closes(),
            &self.config,
        )?;
        tracing::debug!(
            indicator = %self.name,
            bars = series.len(),
            points = points.len(),
            "Calculated KD"
        );
        Ok(align(series, self.config.period - 1, points))
    }
}
