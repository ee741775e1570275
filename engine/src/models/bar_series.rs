use shared::models::{Bar, TimeFrame};

use crate::error::{EngineError, Result};

/// Immutable, chronologically validated sequence of bars (index 0 is the oldest).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Builds a series, rejecting any bar whose timestamp does not strictly exceed its
    /// predecessor's.
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        if let Some(index) = bars.windows(2).position(|w| w[1].timestamp <= w[0].timestamp) {
            let previous = bars[index].timestamp;
            let current = bars[index + 1].timestamp;
            tracing::warn!(
                index = index + 1,
                previous,
                current,
                "Rejecting bar series with non-monotonic timestamps"
            );
            return Err(EngineError::NonMonotonicTimestamps {
                index: index + 1,
                previous,
                current,
            });
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Indices of bars that do not follow their predecessor by exactly one interval.
    /// Indicators do not react to gaps; this only lets callers report them.
    pub fn irregular_spacing(&self, time_frame: TimeFrame) -> Vec<usize> {
        let step = time_frame.duration_millis();
        self.bars
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[1].timestamp - w[0].timestamp != step)
            .map(|(i, _)| i + 1)
            .collect()
    }
}

impl TryFrom<Vec<Bar>> for BarSeries {
    type Error = EngineError;

    fn try_from(bars: Vec<Bar>) -> Result<Self> {
        Self::new(bars)
    }
}
