//! Core types and traits for the trend classification engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (`Bar`, `BarSeries`, `Timeframe`)
//! - The `Trend` classification output
//! - Moving-average comparison descriptors (`MaOption`)
//! - Traits for indicators, indicator providers, and rule configurations
//! - The error taxonomy shared across the workspace

pub mod error;
pub mod traits;
pub mod types;

pub use error::{IndicatorError, StrategyError, TrendError, TrendResult};
pub use traits::*;
pub use types::*;
