// Engine-side data models. Wire types live in `shared::models`.
pub mod bar_series;

pub use bar_series::BarSeries;
