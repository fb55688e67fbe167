//! Moving-average consensus rule.
//!
//! Evaluates an ordered list of moving-average comparisons and requires
//! strict unanimity: every comparison must vote the same direction for the
//! rule to emit a signal. Unlike the RSI rules, no rolling state accumulates
//! between calls.

use serde::{Deserialize, Serialize};
use tracing::debug;
use trend_core::{
    error::{IndicatorError, StrategyError},
    traits::{IndicatorProvider, RuleConfig},
    types::{BarSeries, MaOption, Trend},
};
use trend_indicators::SeriesIndicators;

use crate::rule::RuleState;

/// Configuration for the consensus rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaConsensusConfig {
    /// Comparisons that all must agree, in evaluation order
    pub options: Vec<MaOption>,
}

impl RuleConfig for MaConsensusConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.options.is_empty() {
            return Err(StrategyError::InvalidConfig(
                "At least one moving-average comparison required".into(),
            ));
        }
        for option in &self.options {
            if option.initial_bound == 0 || option.final_bound == 0 {
                return Err(StrategyError::InvalidConfig(format!(
                    "Window bounds must be at least 1 bar: {}",
                    option
                )));
            }
        }
        Ok(())
    }
}

/// Moving-average consensus rule.
pub struct MaConsensus<P: IndicatorProvider = SeriesIndicators> {
    config: MaConsensusConfig,
    provider: P,
    last_averages: Vec<(f64, f64)>,
    trend: Option<Trend>,
    evaluations: usize,
}

impl MaConsensus {
    /// Create the rule with the default windowed indicator provider.
    pub fn new(config: MaConsensusConfig) -> Result<Self, StrategyError> {
        Self::with_provider(config, SeriesIndicators)
    }
}

impl<P: IndicatorProvider> MaConsensus<P> {
    /// Create the rule with an injected indicator provider.
    pub fn with_provider(config: MaConsensusConfig, provider: P) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            config,
            provider,
            last_averages: Vec::new(),
            trend: None,
            evaluations: 0,
        })
    }

    /// Rule name.
    pub fn name(&self) -> &'static str {
        "MA Consensus"
    }

    /// The configured comparisons, in evaluation order.
    pub fn params(&self) -> &[MaOption] {
        &self.config.options
    }

    /// Last computed classification.
    pub fn trend(&self) -> Option<Trend> {
        self.trend
    }

    /// Longest window bound across all comparisons: the minimum history the
    /// caller must supply before the first meaningful evaluation.
    pub fn min_option_period(&self) -> usize {
        self.config
            .options
            .iter()
            .map(MaOption::max_bound)
            .max()
            .unwrap_or(0)
    }

    /// No rolling state to clear beyond the retained classification.
    pub fn reset(&mut self) {
        self.last_averages.clear();
        self.trend = None;
        self.evaluations = 0;
    }

    /// Introspection state for monitoring.
    pub fn state(&self) -> RuleState {
        let mut state = RuleState::new(
            self.name(),
            !self.last_averages.is_empty(),
            self.evaluations,
        );
        state.trend = self.trend;
        for (i, (initial, final_avg)) in self.last_averages.iter().enumerate() {
            state.record(format!("option_{i}_initial"), *initial);
            state.record(format!("option_{i}_final"), *final_avg);
        }
        state
    }

    /// Evaluate the rule over the supplied window.
    pub fn evaluate(&mut self, series: &BarSeries) -> Result<Option<Trend>, StrategyError> {
        self.evaluations += 1;

        let mut averages = Vec::with_capacity(self.config.options.len());
        let mut votes = Vec::with_capacity(self.config.options.len());
        for option in &self.config.options {
            let initial = match self.provider.moving_average(
                series,
                option.kind,
                option.field,
                option.initial_bound,
            ) {
                Ok(value) => value,
                Err(IndicatorError::InsufficientData { .. }) => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            let final_avg = match self.provider.moving_average(
                series,
                option.kind,
                option.field,
                option.final_bound,
            ) {
                Ok(value) => value,
                Err(IndicatorError::InsufficientData { .. }) => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            averages.push((initial, final_avg));
            votes.push(Trend::from_cross(initial, final_avg));
        }
        self.last_averages = averages;

        let trend = if votes.iter().all(|vote| *vote == Some(Trend::Bullish)) {
            Some(Trend::Bullish)
        } else if votes.iter().all(|vote| *vote == Some(Trend::Bearish)) {
            Some(Trend::Bearish)
        } else {
            None
        };
        if trend != self.trend {
            debug!(rule = self.name(), ?trend, "classification changed");
        }
        self.trend = trend;
        Ok(trend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trend_core::types::{Bar, MaKind, PriceField, Timeframe};

    fn series_from(closes: &[f64]) -> BarSeries {
        let mut series = BarSeries::new("TEST", Timeframe::Daily);
        for (i, &close) in closes.iter().enumerate() {
            series.push(Bar::new(i as i64, close, close, close, close, 1.0));
        }
        series
    }

    fn option(field: PriceField) -> MaOption {
        MaOption::new(MaKind::Sma, field, 5, 10)
    }

    /// Field-keyed averages: close comparisons vote bullish (shorter window
    /// averages higher), high comparisons vote bearish, low comparisons tie.
    struct FieldVotes;

    impl IndicatorProvider for FieldVotes {
        fn rsi(
            &self,
            _series: &BarSeries,
            _period: usize,
            _shift: usize,
        ) -> Result<f64, IndicatorError> {
            unreachable!("consensus rule never asks for RSI")
        }

        fn moving_average(
            &self,
            _series: &BarSeries,
            _kind: MaKind,
            field: PriceField,
            period: usize,
        ) -> Result<f64, IndicatorError> {
            Ok(match field {
                PriceField::Close => 100.0 - period as f64,
                PriceField::High => period as f64,
                _ => 50.0,
            })
        }
    }

    #[test]
    fn test_unanimous_bullish() {
        let config = MaConsensusConfig {
            options: vec![
                option(PriceField::Close),
                option(PriceField::Close),
                option(PriceField::Close),
            ],
        };
        let mut rule = MaConsensus::with_provider(config, FieldVotes).unwrap();

        assert_eq!(
            rule.evaluate(&series_from(&[1.0; 12])).unwrap(),
            Some(Trend::Bullish)
        );
    }

    #[test]
    fn test_split_vote_is_no_signal() {
        let config = MaConsensusConfig {
            options: vec![
                option(PriceField::Close),
                option(PriceField::Close),
                option(PriceField::High),
            ],
        };
        let mut rule = MaConsensus::with_provider(config, FieldVotes).unwrap();

        assert_eq!(rule.evaluate(&series_from(&[1.0; 12])).unwrap(), None);
    }

    #[test]
    fn test_tied_averages_break_unanimity() {
        let config = MaConsensusConfig {
            options: vec![option(PriceField::Close), option(PriceField::Low)],
        };
        let mut rule = MaConsensus::with_provider(config, FieldVotes).unwrap();

        assert_eq!(rule.evaluate(&series_from(&[1.0; 12])).unwrap(), None);
    }

    #[test]
    fn test_unanimous_bearish() {
        let config = MaConsensusConfig {
            options: vec![option(PriceField::High), option(PriceField::High)],
        };
        let mut rule = MaConsensus::with_provider(config, FieldVotes).unwrap();

        assert_eq!(
            rule.evaluate(&series_from(&[1.0; 12])).unwrap(),
            Some(Trend::Bearish)
        );
        assert_eq!(rule.trend(), Some(Trend::Bearish));
    }

    #[test]
    fn test_min_option_period() {
        let config = MaConsensusConfig {
            options: vec![
                MaOption::new(MaKind::Sma, PriceField::Close, 8, 21),
                MaOption::new(MaKind::Ema, PriceField::Close, 13, 5),
            ],
        };
        let rule = MaConsensus::new(config).unwrap();

        assert_eq!(rule.min_option_period(), 21);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(MaConsensus::new(MaConsensusConfig { options: vec![] }).is_err());
        assert!(MaConsensus::new(MaConsensusConfig {
            options: vec![MaOption::new(MaKind::Sma, PriceField::Close, 0, 10)],
        })
        .is_err());
    }

    #[test]
    fn test_real_provider_rising_market() {
        let config = MaConsensusConfig {
            options: vec![MaOption::new(MaKind::Sma, PriceField::Close, 2, 4)],
        };
        let mut rule = MaConsensus::new(config).unwrap();

        // A rising close pushes the short average above the long one.
        let series = series_from(&[10.0, 11.0, 12.0, 13.0]);
        assert_eq!(rule.evaluate(&series).unwrap(), Some(Trend::Bullish));

        // Too little history is no-signal, not an error.
        let short = series_from(&[10.0, 11.0, 12.0]);
        assert_eq!(rule.evaluate(&short).unwrap(), None);
    }

    #[test]
    fn test_reset_clears_retained_trend() {
        let config = MaConsensusConfig {
            options: vec![option(PriceField::Close)],
        };
        let mut rule = MaConsensus::with_provider(config, FieldVotes).unwrap();

        rule.evaluate(&series_from(&[1.0; 12])).unwrap();
        assert_eq!(rule.trend(), Some(Trend::Bullish));
        assert!(rule.state().warmed_up);

        rule.reset();
        assert_eq!(rule.trend(), None);
        assert!(!rule.state().warmed_up);
        assert_eq!(rule.state().evaluations, 0);
    }
}
