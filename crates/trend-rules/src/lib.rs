//! Trend rule engines.
//!
//! Each rule classifies a bar-series window into bullish, bearish, or no
//! signal, keeping whatever rolling state its arithmetic needs between
//! calls:
//! - [`RsiDivergence`] — composite of short- and long-window RSI
//!   divergence ratios
//! - [`RsiBand`] — RSI position inside its recent range, smoothed with a
//!   rolling sum and checked against a lower/upper band
//! - [`MaConsensus`] — unanimous vote over a list of moving-average
//!   comparisons
//!
//! The closed [`TrendRule`] enum carries any of the three behind one
//! surface. A single `evaluate(&BarSeries)` call serves both backtest and
//! live use: the caller assembles the window (full history slice or rolling
//! tail) and calls once per period.

mod ma_consensus;
mod registry;
mod rsi_band;
mod rsi_divergence;
mod rule;

pub use ma_consensus::{MaConsensus, MaConsensusConfig};
pub use registry::{RuleInfo, RuleRegistry};
pub use rsi_band::{BandSnapshot, RsiBand, RsiBandConfig};
pub use rsi_divergence::{DivergenceSnapshot, RsiDivergence, RsiDivergenceConfig};
pub use rule::{RuleState, TrendRule};
