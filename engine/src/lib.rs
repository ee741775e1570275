// Engine library root

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod services;

pub use error::{EngineError, Result};
pub use models::BarSeries;
