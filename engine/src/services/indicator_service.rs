// Indicator dispatch by name, plus the all-indicators report for one bar series
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::models::IndicatorSeries;

use crate::config::IndicatorSettings;
use crate::error::{EngineError, Result};
use crate::indicators::{
    BandPoint, BollingerBands, Ema, IndicatorCalculator, KdPoint, Macd, MacdPoint, MomentumPoint,
    Rsi, Sma, Stochastic,
};
use crate::models::BarSeries;

/// Runs the indicator named `indicator_type` with JSON `parameters` (keys not given use
/// defaults).
///
/// Returns `{ "indicator": name, "parameters": {...}, "points": [...] }`.
pub fn calculate_indicator(
    indicator_type: &str,
    parameters: &Value,
    series: &BarSeries,
) -> Result<Value> {
    tracing::debug!(
        indicator_type = %indicator_type,
        bars = series.len(),
        "Handling indicator request"
    );

    match indicator_type.to_lowercase().as_str() {
        "sma" => run(Sma::with_config(parse_parameters(indicator_type, parameters)?), series),
        "ema" => run(Ema::with_config(parse_parameters(indicator_type, parameters)?), series),
        "bollinger" | "boll" => run(
            BollingerBands::new(parse_parameters(indicator_type, parameters)?),
            series,
        ),
        "rsi" => run(Rsi::with_config(parse_parameters(indicator_type, parameters)?), series),
        "kd" | "stochastic" => run(
            Stochastic::new(parse_parameters(indicator_type, parameters)?),
            series,
        ),
        "macd" => run(Macd::new(parse_parameters(indicator_type, parameters)?), series),
        _ => {
            tracing::warn!(indicator_type = %indicator_type, "Unknown indicator type requested");
            Err(EngineError::UnknownIndicator(indicator_type.to_string()))
        }
    }
}

fn parse_parameters<T: DeserializeOwned + Default>(
    indicator_type: &str,
    parameters: &Value,
) -> Result<T> {
    if parameters.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(parameters.clone()).map_err(|e| {
        tracing::warn!(
            indicator_type = %indicator_type,
            parameters = %parameters,
            error_detail = ?e,
            "Invalid JSON parameters for indicator"
        );
        EngineError::InvalidConfiguration(format!(
            "Invalid parameters for indicator '{}': {}",
            indicator_type, e
        ))
    })
}

fn run<C: IndicatorCalculator>(calculator: C, series: &BarSeries) -> Result<Value> {
    let points = calculator.calculate(series)?;
    Ok(serde_json::json!({
        "indicator": calculator.name(),
        "parameters": calculator.parameters(),
        "points": serde_json::to_value(points)?,
    }))
}

/// Every indicator for one series. An indicator without enough history yet is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorReport {
    pub bars: usize,
    pub sma: Option<IndicatorSeries<f64>>,
    pub ema: Option<IndicatorSeries<f64>>,
    pub bollinger: Option<IndicatorSeries<BandPoint>>,
    pub rsi: Option<IndicatorSeries<MomentumPoint>>,
    pub kd: Option<IndicatorSeries<KdPoint>>,
    pub macd: Option<IndicatorSeries<MacdPoint>>,
}

impl IndicatorReport {
    pub fn build(series: &BarSeries, settings: &IndicatorSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            bars: series.len(),
            sma: available(Sma::with_config(settings.sma), series)?,
            ema: available(Ema::with_config(settings.ema), series)?,
            bollinger: available(BollingerBands::new(settings.bollinger), series)?,
            rsi: available(Rsi::with_config(settings.rsi), series)?,
            kd: available(Stochastic::new(settings.kd), series)?,
            macd: available(Macd::new(settings.macd), series)?,
        })
    }
}

fn available<C: IndicatorCalculator>(
    calculator: C,
    series: &BarSeries,
) -> Result<Option<IndicatorSeries<C::Output>>> {
    match calculator.calculate(series) {
        Ok(points) => Ok(Some(points)),
        Err(err) if err.is_insufficient_data() => {
            tracing::info!(
                indicator = %calculator.name(),
                bars = series.len(),
                "Not enough history yet"
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
