// Snapshot RSI reading and the trading advice derived from it
use serde::Serialize;
use shared::models::Signal;
use shared::utils::percent_change;

use crate::error::{EngineError, Result};
use crate::indicators::rsi::{gains_and_losses, relative_strength, seed_averages};
use crate::indicators::{require_len, seeded_len, validate_period, MomentumConfig};
use crate::models::BarSeries;

/// RSI over the most recent `period` close-to-close changes, using their simple
/// averages only (no Wilder smoothing). Needs at least `period + 1` closes.
pub fn latest_rsi(closes: &[f64], period: usize) -> Result<f64> {
    validate_period("period", period)?;
    let required = seeded_len(period);
    require_len(closes.len(), required)?;

    let recent = &closes[closes.len() - required..];
    let (avg_gain, avg_loss) = seed_averages(&gains_and_losses(recent), period);
    Ok(relative_strength(avg_gain, avg_loss))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Advice {
    Oversold,
    Overbought,
    Neutral,
}

impl Advice {
    pub fn from_signal(signal: Signal) -> Self {
        match signal {
            Signal::Buy => Advice::Oversold,
            Signal::Sell => Advice::Overbought,
            Signal::None => Advice::Neutral,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Advice::Oversold => "Market may be oversold, consider buying",
            Advice::Overbought => "Market may be overbought, consider taking profit",
            Advice::Neutral => "Market is neutral, hold and watch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingAdvice {
    /// Timestamp of the newest bar the reading covers.
    pub timestamp: i64,
    pub rsi: f64,
    pub advice: Advice,
    pub message: &'static str,
    pub buy_signal: bool,
    /// Move of the last close relative to the one before it, in percent.
    pub change_percent: Option<f64>,
}

impl TradingAdvice {
    pub fn evaluate(series: &BarSeries, config: &MomentumConfig) -> Result<Self> {
        config.validate()?;
        let closes = series.closes();
        let rsi = latest_rsi(&closes, config.period)?;
        let timestamp = series
            .last()
            .map(|bar| bar.timestamp)
            .ok_or(EngineError::InsufficientData {
                required: seeded_len(config.period),
                actual: 0,
            })?;

        let change_percent = match closes.as_slice() {
            [.., previous, current] => percent_change(*previous, *current),
            _ => None,
        };

        let signal = config.thresholds().classify(rsi);
        let advice = Advice::from_signal(signal);
        tracing::debug!(timestamp, rsi, ?advice, "Evaluated trading advice");
        Ok(Self {
            timestamp,
            rsi,
            advice,
            message: advice.message(),
            buy_signal: signal == Signal::Buy,
            change_percent,
        })
    }
}
