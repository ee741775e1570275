// Services built on top of the indicator core
pub mod indicator_service;
pub mod trading_advice;

pub use indicator_service::{calculate_indicator, IndicatorReport};
pub use trading_advice::{Advice, TradingAdvice};
