//! Core data types for the trend engine.

mod ma_option;
mod ohlcv;
mod timeframe;
mod trend;

pub use ma_option::{MaKind, MaOption, PriceField};
pub use ohlcv::{Bar, BarSeries};
pub use timeframe::Timeframe;
pub use trend::Trend;
