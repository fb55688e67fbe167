//! Technical indicator primitives for the trend engine.
//!
//! This crate provides the batch indicators the rule engines build on:
//! - Moving averages (SMA, EMA, WMA)
//! - Wilder-smoothed RSI
//!
//! plus [`SeriesIndicators`], the default [`trend_core::IndicatorProvider`]
//! that computes single readings (with an optional historical shift) over a
//! bar series window.

pub mod momentum;
pub mod moving_average;
pub mod provider;

pub use momentum::Rsi;
pub use moving_average::{Ema, Sma, Wma};
pub use provider::SeriesIndicators;
