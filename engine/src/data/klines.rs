// Decoder for the provider's kline payload:
// [[openTime, "open", "high", "low", "close", "volume", closeTime, ...], ...]
use serde_json::Value;
use shared::models::Bar;

use crate::error::{EngineError, Result};

pub fn parse_klines(json: &str) -> Result<Vec<Bar>> {
    let payload: Value = serde_json::from_str(json)?;
    let rows = payload.as_array().ok_or_else(|| {
        EngineError::DataFormatError("Kline payload must be a JSON array".to_string())
    })?;

    rows.iter().enumerate().map(|(row, kline)| parse_kline(row, kline)).collect()
}

fn parse_kline(row: usize, kline: &Value) -> Result<Bar> {
    let fields = kline
        .as_array()
        .filter(|fields| fields.len() >= 5)
        .ok_or_else(|| {
            EngineError::DataFormatError(format!(
                "Kline {} must be an array of at least 5 fields",
                row
            ))
        })?;

    let timestamp = fields[0].as_i64().ok_or_else(|| {
        EngineError::DataFormatError(format!("Kline {} has an invalid open time", row))
    })?;

    Ok(Bar {
        timestamp,
        open: price(row, "open", &fields[1])?,
        high: price(row, "high", &fields[2])?,
        low: price(row, "low", &fields[3])?,
        close: price(row, "close", &fields[4])?,
    })
}

// Prices arrive as decimal strings; plain numbers are accepted too.
fn price(row: usize, name: &str, field: &Value) -> Result<f64> {
    let parsed = match field {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        EngineError::DataFormatError(format!(
            "Kline {} has an invalid {} price: {}",
            row, name, field
        ))
    })
}
