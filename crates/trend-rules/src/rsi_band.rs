//! RSI band rule with rolling-sum smoothing.
//!
//! Samples RSI across a window of shifts, reduces the window to how far the
//! newest reading sits above the window low relative to the window span,
//! smooths both quantities with a rolling sum, and checks the resulting
//! percentage against a lower/upper band: below the lower bound is bullish,
//! above the upper bound is bearish.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;
use trend_core::{
    error::{IndicatorError, StrategyError},
    traits::{IndicatorProvider, RuleConfig},
    types::{BarSeries, Trend},
};
use trend_indicators::SeriesIndicators;

use crate::rule::{highest, lowest, round_to, RuleState};

/// Configuration for the RSI band rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiBandConfig {
    /// Band floor: a band percentage below this reads bullish
    pub lower: i64,
    /// RSI window length
    pub rsi_period: usize,
    /// Rolling-sum window length
    pub sum_window: usize,
    /// Band ceiling: a band percentage above this reads bearish
    pub upper: i64,
    /// Decimal places kept in the display snapshot
    #[serde(default = "default_precision")]
    pub precision: u32,
}

fn default_precision() -> u32 {
    2
}

impl Default for RsiBandConfig {
    fn default() -> Self {
        Self {
            lower: 30,
            rsi_period: 14,
            sum_window: 5,
            upper: 70,
            precision: 2,
        }
    }
}

impl RuleConfig for RsiBandConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.rsi_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "RSI window must be at least 1 bar".into(),
            ));
        }
        if self.lower >= self.upper {
            return Err(StrategyError::InvalidConfig(
                "Lower band must be below upper band".into(),
            ));
        }
        Ok(())
    }
}

/// Latest derived readings, rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSnapshot {
    /// Span (max − min) of the sampled RSI window
    pub span: f64,
    /// Newest RSI reading above the window low
    pub rise: f64,
    /// Rolling sum of rises
    pub rise_sum: f64,
    /// Rolling sum of spans
    pub span_sum: f64,
    /// Smoothed band position, percent
    pub band_pct: f64,
}

/// RSI band rule.
pub struct RsiBand<P: IndicatorProvider = SeriesIndicators> {
    config: RsiBandConfig,
    provider: P,
    span_hist: VecDeque<f64>,
    rise_hist: VecDeque<f64>,
    snapshot: Option<BandSnapshot>,
    trend: Option<Trend>,
    evaluations: usize,
}

impl RsiBand {
    /// Create the rule with the default windowed indicator provider.
    pub fn new(config: RsiBandConfig) -> Result<Self, StrategyError> {
        Self::with_provider(config, SeriesIndicators)
    }
}

impl<P: IndicatorProvider> RsiBand<P> {
    /// Create the rule with an injected indicator provider.
    pub fn with_provider(config: RsiBandConfig, provider: P) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            config,
            provider,
            span_hist: VecDeque::new(),
            rise_hist: VecDeque::new(),
            snapshot: None,
            trend: None,
            evaluations: 0,
        })
    }

    /// Rule name.
    pub fn name(&self) -> &'static str {
        "RSI Band"
    }

    /// The four band parameters, in construction order.
    pub fn params(&self) -> [i64; 4] {
        [
            self.config.lower,
            self.config.rsi_period as i64,
            self.config.sum_window as i64,
            self.config.upper,
        ]
    }

    /// Last computed classification.
    pub fn trend(&self) -> Option<Trend> {
        self.trend
    }

    /// Latest display snapshot, present once a full computation has run.
    pub fn snapshot(&self) -> Option<&BandSnapshot> {
        self.snapshot.as_ref()
    }

    /// Minimum window length for the rolling state to advance.
    pub fn warmup_period(&self) -> usize {
        self.config.rsi_period + 2
    }

    /// Clear all rolling state; the next call behaves as freshly built.
    pub fn reset(&mut self) {
        self.span_hist.clear();
        self.rise_hist.clear();
        self.snapshot = None;
        self.trend = None;
        self.evaluations = 0;
    }

    /// Introspection state for monitoring.
    pub fn state(&self) -> RuleState {
        let mut state = RuleState::new(self.name(), self.snapshot.is_some(), self.evaluations);
        state.trend = self.trend;
        if let Some(snap) = &self.snapshot {
            state.record("span", snap.span);
            state.record("rise", snap.rise);
            state.record("rise_sum", snap.rise_sum);
            state.record("span_sum", snap.span_sum);
            state.record("band_pct", snap.band_pct);
        }
        state
    }

    /// Evaluate the rule over the supplied window.
    pub fn evaluate(&mut self, series: &BarSeries) -> Result<Option<Trend>, StrategyError> {
        self.evaluations += 1;
        let RsiBandConfig {
            lower,
            rsi_period,
            sum_window,
            upper,
            precision,
        } = self.config;

        if series.len() <= rsi_period + 1 {
            return Ok(None);
        }

        let mut samples = Vec::with_capacity(rsi_period + 1);
        for shift in 0..=rsi_period {
            match self.provider.rsi(series, rsi_period, shift) {
                Ok(value) => samples.push(value),
                Err(IndicatorError::InsufficientData { .. }) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }

        let latest = samples[0];
        let low = lowest(&samples);
        let span = highest(&samples) - low;
        let rise = latest - low;

        // Oldest-first accumulation; the window slides one entry per call
        // once full.
        self.span_hist.push_back(span);
        self.rise_hist.push_back(rise);

        if self.span_hist.len() < sum_window + 1 {
            return Ok(None);
        }

        let rise_sum: f64 = self.rise_hist.iter().take(sum_window + 1).sum();
        let span_sum: f64 = self.span_hist.iter().take(sum_window + 1).sum();
        self.rise_hist.pop_front();
        self.span_hist.pop_front();

        if span_sum == 0.0 {
            return Err(StrategyError::DegenerateDivisor {
                context: "RSI span window",
            });
        }
        let band_pct = rise_sum / span_sum * 100.0;

        self.snapshot = Some(BandSnapshot {
            span: round_to(span, precision),
            rise: round_to(rise, precision),
            rise_sum: round_to(rise_sum, precision),
            span_sum: round_to(span_sum, precision),
            band_pct: round_to(band_pct, precision),
        });

        let trend = if (lower as f64) > band_pct {
            Some(Trend::Bullish)
        } else if band_pct > upper as f64 {
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
