// SMA / EMA primitives shared by every higher-level indicator.
use serde::{Deserialize, Serialize};

use super::validate_period;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverageConfig {
    pub period: usize,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl MovingAverageConfig {
    pub fn validate(&self) -> Result<()> {
        validate_period("period", self.period)
    }
}

/// Trailing simple moving average. Positions before `period - 1` are `None`.
pub fn sma(values: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    validate_period("period", period)?;
    if values.is_empty() {
        return Err(EngineError::InsufficientData { required: 1, actual: 0 });
    }

    Ok((0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                Some(window_mean(&values[i + 1 - period..=i]))
            }
        })
        .collect())
}

/// Exponential moving average with `k = 2 / (period + 1)`.
///
/// Seeded with the first value rather than an SMA of the first `period` values,
/// so it is defined at every position.
pub fn ema(values: &[f64], period: usize) -> Result<Vec<f64>> {
    validate_period("period", period)?;
    let Some(&first) = values.first() else {
        return Err(EngineError::InsufficientData { required: 1, actual: 0 });
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut results = Vec::with_capacity(values.len());
    let mut previous = first;
    results.push(previous);
    for &value in &values[1..] {
        previous = value * k + previous * (1.0 - k);
        results.push(previous);
    }
    Ok(results)
}

// Each window is summed afresh, left to right, instead of with a running sum.
pub(crate) fn window_mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}
