//! The closed rule set and shared rule machinery.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use trend_core::{
    error::StrategyError,
    traits::IndicatorProvider,
    types::{BarSeries, Trend},
};
use trend_indicators::SeriesIndicators;

use crate::{MaConsensus, RsiBand, RsiDivergence};

/// Introspection snapshot of a rule for monitoring and reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleState {
    /// Rule name
    pub name: String,
    /// Whether a full computation has run at least once
    pub warmed_up: bool,
    /// Number of evaluations since construction or reset
    pub evaluations: usize,
    /// Current classification
    pub trend: Option<Trend>,
    /// Latest derived readings by name
    pub indicators: HashMap<String, f64>,
}

impl RuleState {
    pub(crate) fn new(name: &str, warmed_up: bool, evaluations: usize) -> Self {
        Self {
            name: name.to_string(),
            warmed_up,
            evaluations,
            trend: None,
            indicators: HashMap::new(),
        }
    }

    pub(crate) fn record(&mut self, key: impl Into<String>, value: f64) {
        self.indicators.insert(key.into(), value);
    }
}

/// The closed set of trend rules.
///
/// Dispatch is an exhaustive match rather than a trait object, so the rule
/// set stays explicit and adding a variant forces every call site to handle
/// it.
pub enum TrendRule<P: IndicatorProvider = SeriesIndicators> {
    RsiDivergence(RsiDivergence<P>),
    RsiBand(RsiBand<P>),
    MaConsensus(MaConsensus<P>),
}

impl<P: IndicatorProvider> TrendRule<P> {
    /// Rule name.
    pub fn name(&self) -> &'static str {
        match self {
            TrendRule::RsiDivergence(rule) => rule.name(),
            TrendRule::RsiBand(rule) => rule.name(),
            TrendRule::MaConsensus(rule) => rule.name(),
        }
    }

    /// Evaluate the rule over the supplied window.
    pub fn evaluate(&mut self, series: &BarSeries) -> Result<Option<Trend>, StrategyError> {
        match self {
            TrendRule::RsiDivergence(rule) => rule.evaluate(series),
            TrendRule::RsiBand(rule) => rule.evaluate(series),
            TrendRule::MaConsensus(rule) => rule.evaluate(series),
        }
    }

    /// Last computed classification.
    pub fn trend(&self) -> Option<Trend> {
        match self {
            TrendRule::RsiDivergence(rule) => rule.trend(),
            TrendRule::RsiBand(rule) => rule.trend(),
            TrendRule::MaConsensus(rule) => rule.trend(),
        }
    }

    /// Clear all rolling state; the next call behaves as freshly built.
    pub fn reset(&mut self) {
        match self {
            TrendRule::RsiDivergence(rule) => rule.reset(),
            TrendRule::RsiBand(rule) => rule.reset(),
            TrendRule::MaConsensus(rule) => rule.reset(),
        }
    }

    /// Minimum history length for a meaningful evaluation.
    pub fn warmup_period(&self) -> usize {
        match self {
            TrendRule::RsiDivergence(rule) => rule.warmup_period(),
            TrendRule::RsiBand(rule) => rule.warmup_period(),
            TrendRule::MaConsensus(rule) => rule.min_option_period(),
        }
    }

    /// The rule's immutable configuration values, for reporting.
    pub fn parameters(&self) -> serde_json::Value {
        match self {
            TrendRule::RsiDivergence(rule) => serde_json::json!(rule.params()),
            TrendRule::RsiBand(rule) => serde_json::json!(rule.params()),
            TrendRule::MaConsensus(rule) => {
                serde_json::to_value(rule.params()).unwrap_or(serde_json::Value::Null)
            }
        }
    }

    /// Introspection state for monitoring.
    pub fn state(&self) -> RuleState {
        match self {
            TrendRule::RsiDivergence(rule) => rule.state(),
            TrendRule::RsiBand(rule) => rule.state(),
            TrendRule::MaConsensus(rule) => rule.state(),
        }
    }
}

impl<P: IndicatorProvider> From<RsiDivergence<P>> for TrendRule<P> {
    fn from(rule: RsiDivergence<P>) -> Self {
        TrendRule::RsiDivergence(rule)
    }
}

impl<P: IndicatorProvider> From<RsiBand<P>> for TrendRule<P> {
    fn from(rule: RsiBand<P>) -> Self {
        TrendRule::RsiBand(rule)
    }
}

impl<P: IndicatorProvider> From<MaConsensus<P>> for TrendRule<P> {
    fn from(rule: MaConsensus<P>) -> Self {
        TrendRule::MaConsensus(rule)
    }
}

/// Round to a fixed number of decimal places for display snapshots.
pub(crate) fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Smallest value in a window.
pub(crate) fn lowest(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Largest value in a window.
pub(crate) fn highest(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MaConsensusConfig, RsiBandConfig, RsiDivergenceConfig};
    use trend_core::types::{Bar, MaKind, MaOption, PriceField, Timeframe};

    fn rising_series(len: usize) -> BarSeries {
        let mut series = BarSeries::new("TEST", Timeframe::Daily);
        for i in 0..len {
            let price = 10.0 + i as f64;
            series.push(Bar::new(i as i64, price, price, price, price, 1.0));
        }
        series
    }

    fn consensus_rule() -> TrendRule {
        let config = MaConsensusConfig {
            options: vec![MaOption::new(MaKind::Sma, PriceField::Close, 3, 6)],
        };
        MaConsensus::new(config).unwrap().into()
    }

    #[test]
    fn test_enum_dispatch() {
        let mut rule = consensus_rule();

        assert_eq!(rule.name(), "MA Consensus");
        assert_eq!(rule.warmup_period(), 6);
        assert_eq!(
            rule.evaluate(&rising_series(8)).unwrap(),
            Some(Trend::Bullish)
        );
        assert_eq!(rule.trend(), Some(Trend::Bullish));

        rule.reset();
        assert_eq!(rule.trend(), None);
    }

    #[test]
    fn test_parameters_are_reportable() {
        let divergence: TrendRule = RsiDivergence::new(RsiDivergenceConfig {
            short_period: 5,
            long_period: 10,
            smoothing: 3,
            precision: 2,
        })
        .unwrap()
        .into();
        assert_eq!(divergence.parameters(), serde_json::json!([5, 10, 3]));

        let band: TrendRule = RsiBand::new(RsiBandConfig {
            lower: 30,
            rsi_period: 14,
            sum_window: 5,
            upper: 70,
            precision: 2,
        })
        .unwrap()
        .into();
        assert_eq!(band.parameters(), serde_json::json!([30, 14, 5, 70]));

        let consensus = consensus_rule();
        let rendered = consensus.parameters();
        assert_eq!(rendered[0]["initial_bound"], serde_json::json!(3));
        assert_eq!(rendered[0]["final_bound"], serde_json::json!(6));
    }

    #[test]
    fn test_state_carries_rule_name() {
        let rule = consensus_rule();
        let state = rule.state();

        assert_eq!(state.name, "MA Consensus");
        assert!(!state.warmed_up);
        assert_eq!(state.evaluations, 0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.235, 2), 1.24);
        assert_eq!(round_to(-7.0 / 3.0, 3), -2.333);
    }

    #[test]
    fn test_window_extremes() {
        let window = [3.0, -1.0, 8.0, 2.5];
        assert_eq!(lowest(&window), -1.0);
        assert_eq!(highest(&window), 8.0);
    }
}
