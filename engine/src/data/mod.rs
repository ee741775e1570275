// Local bar sources. Fetching from a provider happens outside the engine.
pub mod csv_parser;
pub mod klines;

pub use csv_parser::BarCsvParser;
pub use klines::parse_klines;
