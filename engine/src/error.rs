use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid indicator configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Timestamps must strictly increase: bar {index} has {current}, previous {previous}")]
    NonMonotonicTimestamps {
        index: usize,
        previous: i64,
        current: i64,
    },

    #[error("Unknown indicator type: {0}")]
    UnknownIndicator(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Data format error: {0}")]
    DataFormatError(String),

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

impl EngineError {
    /// "Not enough history yet", as opposed to a hard failure.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, EngineError::InsufficientData { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
