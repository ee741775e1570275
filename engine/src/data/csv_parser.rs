use csv::{ReaderBuilder, Trim};
use shared::models::Bar;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{EngineError, Result};

/// Reads bars from delimited text with a `timestamp,open,high,low,close` header.
/// Column order is free and extra columns (volume, trades, ...) are ignored.
pub struct BarCsvParser {
    delimiter: u8,
}

impl Default for BarCsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl BarCsvParser {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn load_bars_from_csv(&self, path: impl AsRef<Path>) -> Result<Vec<Bar>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            EngineError::CsvDataFormatError(format!(
                "Failed to open CSV file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let bars = self.parse_bars_from_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), bars = bars.len(), "Loaded bars from CSV");
        Ok(bars)
    }

    pub fn parse_bars_from_reader<R: Read>(&self, reader: R) -> Result<Vec<Bar>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for required in ["timestamp", "open", "high", "low", "close"] {
            if !headers.iter().any(|h| h == required) {
                return Err(EngineError::CsvDataFormatError(format!(
                    "Missing '{}' column in CSV header",
                    required
                )));
            }
        }

        let mut bars = Vec::new();
        for (idx, result) in rdr.deserialize::<Bar>().enumerate() {
            let bar = result.map_err(|e| {
                EngineError::CsvDataFormatError(format!(
                    "Error parsing bar at line {}: {}",
                    idx + 2,
                    e
                ))
            })?;
            bars.push(bar);
        }
        Ok(bars)
    }
}
