use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One OHLC interval. `timestamp` is the interval open time in epoch millis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { timestamp, open, high, low, close }
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    Hour1,
    Hour4,
    Day1,
    Week1,
    Month1,
}

impl TimeFrame {
    /// Interval code understood by the kline provider.
    pub fn as_interval(&self) -> &'static str {
        match self {
            TimeFrame::Hour1 => "1h",
            TimeFrame::Hour4 => "4h",
            TimeFrame::Day1 => "1d",
            TimeFrame::Week1 => "1w",
            TimeFrame::Month1 => "1M",
        }
    }

    // A month is approximated as 30 days.
    pub fn duration_millis(&self) -> i64 {
        const HOUR: i64 = 3_600_000;
        match self {
            TimeFrame::Hour1 => HOUR,
            TimeFrame::Hour4 => 4 * HOUR,
            TimeFrame::Day1 => 24 * HOUR,
            TimeFrame::Week1 => 7 * 24 * HOUR,
            TimeFrame::Month1 => 30 * 24 * HOUR,
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_interval())
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "1M" (month) and "1m" (minute) differ only by case, so no lowercasing here.
        match s.trim() {
            "1h" => Ok(TimeFrame::Hour1),
            "4h" => Ok(TimeFrame::Hour4),
            "1d" => Ok(TimeFrame::Day1),
            "1w" => Ok(TimeFrame::Week1),
            "1M" => Ok(TimeFrame::Month1),
            other => Err(format!("Unsupported time frame: {}", other)),
        }
    }
}

/// A single indicator reading keyed by the timestamp of the bar it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint<T> {
    pub timestamp: i64,
    pub value: T,
}

impl<T> IndicatorPoint<T> {
    pub fn new(timestamp: i64, value: T) -> Self {
        Self { timestamp, value }
    }
}

/// Ordered by timestamp ascending; warm-up positions are omitted rather than padded.
pub type IndicatorSeries<T> = Vec<IndicatorPoint<T>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    None,
}
