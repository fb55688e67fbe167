//! RSI divergence composite rule.
//!
//! Runs RSI over a short and a long window, reduces each window to how far
//! the newest reading has risen off the window low relative to the window's
//! full span, and compares the smoothed long-window ratio against the
//! short-window ratio. A smoothed long ratio above the short ratio reads as
//! bearish, below as bullish.

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

/// Ratios always combine the three newest readings.
const RATIO_WINDOW: usize = 3;

/// Configuration for the RSI divergence rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiDivergenceConfig {
    /// Short RSI window length
    pub short_period: usize,
    /// Long RSI window length
    pub long_period: usize,
    /// Smoothing divisor applied to the long-window ratio history
    pub smoothing: usize,
    /// Decimal places kept in the display snapshot
    #[serde(default = "default_precision")]
    pub precision: u32,
}

fn default_precision() -> u32 {
    2
}

impl Default for RsiDivergenceConfig {
    fn default() -> Self {
        Self {
            short_period: 14,
            long_period: 28,
            smoothing: 3,
            precision: 2,
        }
    }
}

impl RuleConfig for RsiDivergenceConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.short_period == 0 || self.long_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "RSI windows must be at least 1 bar".into(),
            ));
        }
        if self.smoothing == 0 {
            return Err(StrategyError::InvalidConfig(
                "Smoothing window must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Latest derived readings, rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivergenceSnapshot {
    /// Span (max − min) of the short RSI window
    pub short_span: f64,
    /// Newest short RSI reading above the window low
    pub short_rise: f64,
    /// Newest long RSI reading above the window low
    pub long_rise: f64,
    /// Span of the long RSI window
    pub long_span: f64,
    /// Long rise-over-span ratio, percent
    pub long_strength: f64,
    /// Short rise-over-span ratio, percent
    pub short_strength: f64,
    /// Mean of the newest long-strength readings
    pub smoothed: f64,
}

/// RSI divergence composite rule.
pub struct RsiDivergence<P: IndicatorProvider = SeriesIndicators> {
    config: RsiDivergenceConfig,
    provider: P,
    short_span: VecDeque<f64>,
    short_rise: VecDeque<f64>,
    long_rise: VecDeque<f64>,
    long_span: VecDeque<f64>,
    long_strength: VecDeque<f64>,
    snapshot: Option<DivergenceSnapshot>,
    trend: Option<Trend>,
    evaluations: usize,
}

impl RsiDivergence {
    /// Create the rule with the default windowed indicator provider.
    pub fn new(config: RsiDivergenceConfig) -> Result<Self, StrategyError> {
        Self::with_provider(config, SeriesIndicators)
    }
}

impl<P: IndicatorProvider> RsiDivergence<P> {
    /// Create the rule with an injected indicator provider.
    pub fn with_provider(config: RsiDivergenceConfig, provider: P) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            config,
            provider,
            short_span: VecDeque::new(),
            short_rise: VecDeque::new(),
            long_rise: VecDeque::new(),
            long_span: VecDeque::new(),
            long_strength: VecDeque::new(),
            snapshot: None,
            trend: None,
            evaluations: 0,
        })
    }

    /// Rule name.
    pub fn name(&self) -> &'static str {
        "RSI Divergence"
    }

    /// The three window parameters, in construction order.
    pub fn params(&self) -> [usize; 3] {
        [
            self.config.short_period,
            self.config.long_period,
            self.config.smoothing,
        ]
    }

    /// Last computed classification.
    pub fn trend(&self) -> Option<Trend> {
        self.trend
    }

    /// Latest display snapshot, present once a full computation has run.
    pub fn snapshot(&self) -> Option<&DivergenceSnapshot> {
        self.snapshot.as_ref()
    }

    /// Minimum window length for the rolling state to advance.
    pub fn warmup_period(&self) -> usize {
        self.config
            .short_period
            .max(self.config.long_period)
            .max(self.config.smoothing)
            + 1
    }

    /// Clear all rolling state; the next call behaves as freshly built.
    pub fn reset(&mut self) {
        self.short_span.clear();
        self.short_rise.clear();
        self.long_rise.clear();
        self.long_span.clear();
        self.long_strength.clear();
        self.snapshot = None;
        self.trend = None;
        self.evaluations = 0;
    }

    /// Introspection state for monitoring.
    pub fn state(&self) -> RuleState {
        let mut state = RuleState::new(self.name(), self.snapshot.is_some(), self.evaluations);
        state.trend = self.trend;
        if let Some(snap) = &self.snapshot {
            state.record("short_span", snap.short_span);
            state.record("short_rise", snap.short_rise);
            state.record("long_rise", snap.long_rise);
            state.record("long_span", snap.long_span);
            state.record("long_strength", snap.long_strength);
            state.record("short_strength", snap.short_strength);
            state.record("smoothed", snap.smoothed);
        }
        state
    }

    /// One RSI reading per shift, newest first.
    ///
    /// `Ok(None)` when the window cannot cover the deepest shift yet.
    fn rsi_window(
        &self,
        series: &BarSeries,
        period: usize,
    ) -> Result<Option<Vec<f64>>, StrategyError> {
        let mut values = Vec::with_capacity(period);
        for shift in 0..period {
            match self.provider.rsi(series, period, shift) {
                Ok(value) => values.push(value),
                Err(IndicatorError::InsufficientData { .. }) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(Some(values))
    }

    /// Evaluate the rule over the supplied window.
    pub fn evaluate(&mut self, series: &BarSeries) -> Result<Option<Trend>, StrategyError> {
        self.evaluations += 1;
        let RsiDivergenceConfig {
            short_period,
            long_period,
            smoothing,
            precision,
        } = self.config;

        // Too little history is a quiet no-signal; the retained trend is
        // left as-is and no state moves.
        if series.len() <= short_period.max(long_period).max(smoothing) {
            return Ok(None);
        }

        let Some(short) = self.rsi_window(series, short_period)? else {
            return Ok(None);
        };
        let Some(long) = self.rsi_window(series, long_period)? else {
            return Ok(None);
        };

        let short_span = highest(&short) - lowest(&short);
        let short_rise = short[0] - lowest(&short);
        let long_rise = long[0] - lowest(&long);
        let long_span = highest(&long) - lowest(&long);

        push_newest(&mut self.short_span, short_span, RATIO_WINDOW);
        push_newest(&mut self.short_rise, short_rise, RATIO_WINDOW);
        push_newest(&mut self.long_rise, long_rise, RATIO_WINDOW);
        push_newest(&mut self.long_span, long_span, RATIO_WINDOW);

        if self.long_rise.len() < RATIO_WINDOW {
            self.trend = None;
            return Ok(None);
        }

        let long_span_sum: f64 = self.long_span.iter().take(RATIO_WINDOW).sum();
        if long_span_sum == 0.0 {
            return Err(StrategyError::DegenerateDivisor {
                context: "long RSI span window",
            });
        }
        let long_rise_sum: f64 = self.long_rise.iter().take(RATIO_WINDOW).sum();
        let long_strength = long_rise_sum / long_span_sum * 100.0;
        push_newest(
            &mut self.long_strength,
            long_strength,
            smoothing.max(RATIO_WINDOW),
        );

        if self.long_strength.len() < RATIO_WINDOW {
            self.trend = None;
            return Ok(None);
        }

        let short_span_sum: f64 = self.short_span.iter().take(RATIO_WINDOW).sum();
        if short_span_sum == 0.0 {
            return Err(StrategyError::DegenerateDivisor {
                context: "short RSI span window",
            });
        }
        let short_rise_sum: f64 = self.short_rise.iter().take(RATIO_WINDOW).sum();
        let short_strength = short_rise_sum / short_span_sum * 100.0;

        // The divisor stays `smoothing` even while fewer readings exist, so
        // the first smoothed values are biased low.
        let smoothed =
            self.long_strength.iter().take(smoothing).sum::<f64>() / smoothing as f64;

        self.snapshot = Some(DivergenceSnapshot {
            short_span: round_to(short_span, precision),
            short_rise: round_to(short_rise, precision),
            long_rise: round_to(long_rise, precision),
            long_span: round_to(long_span, precision),
            long_strength: round_to(long_strength, precision),
            short_strength: round_to(short_strength, precision),
            smoothed: round_to(smoothed, precision),
        });

        let trend = Trend::from_cross(short_strength, smoothed);
        if trend != self.trend {
            debug!(rule = self.name(), ?trend, "classification changed");
        }
        self.trend = trend;
        Ok(trend)
    }
}

/// Prepend a reading and drop anything beyond `cap`.
fn push_newest(history: &mut VecDeque<f64>, value: f64, cap: usize) {
    history.push_front(value);
    history.truncate(cap);
}
