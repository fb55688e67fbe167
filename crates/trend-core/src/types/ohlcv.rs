//! OHLCV bar and series types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::{PriceField, Timeframe};

/// A single OHLCV bar. Plain `f64` fields keep indicator arithmetic fast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Read the given price field.
    #[inline]
    pub fn field(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
        }
    }

    /// Check if the bar closed above its open.
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if the bar closed below its open.
    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for Bar {
    fn default() -> Self {
        Self {
            timestamp: 0,
            open: 0.0,
            high: 0.0,
            low: 0.0,
            close: 0.0,
            volume: 0.0,
        }
    }
}

/// Time-ordered container of bars, oldest first.
///
/// This is the history window rules evaluate against: a backtester passes a
/// slice of stored history, a live loop keeps a capacity-bounded tail and
/// pushes one bar per period.
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: VecDeque<Bar>,
    /// Maximum length (0 = unbounded)
    capacity: usize,
}

impl BarSeries {
    /// Create a new empty, unbounded series.
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars: VecDeque::new(),
            capacity: 0,
        }
    }

    /// Create a series that keeps only the newest `capacity` bars.
    pub fn with_capacity(symbol: impl Into<String>, timeframe: Timeframe, capacity: usize) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a bar, evicting the oldest when at capacity.
    pub fn push(&mut self, bar: Bar) {
        if self.capacity > 0 && self.bars.len() >= self.capacity {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
    }

    /// Append several bars.
    pub fn extend(&mut self, bars: impl IntoIterator<Item = Bar>) {
        for bar in bars {
            self.push(bar);
        }
    }

    /// Number of bars held.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series holds no bars.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The newest bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Bar by index, 0 = oldest.
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Extract one price field across all bars, oldest first.
    pub fn values(&self, field: PriceField) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.field(field)).collect()
    }

    /// Extract close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.values(PriceField::Close)
    }

    /// Drop all bars.
    pub fn clear(&mut self) {
        self.bars.clear();
    }

    /// Iterate over the bars, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

impl FromIterator<Bar> for BarSeries {
    fn from_iter<T: IntoIterator<Item = Bar>>(iter: T) -> Self {
        Self {
            symbol: String::new(),
            timeframe: Timeframe::Daily,
            bars: iter.into_iter().collect(),
            capacity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_fields() {
        let bar = Bar::new(1000, 100.0, 108.0, 97.0, 104.0, 2500.0);

        assert_eq!(bar.field(PriceField::Open), 100.0);
        assert_eq!(bar.field(PriceField::High), 108.0);
        assert_eq!(bar.field(PriceField::Low), 97.0);
        assert_eq!(bar.field(PriceField::Close), 104.0);
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
        assert_eq!(bar.datetime().timestamp_millis(), 1000);
    }

    #[test]
    fn test_series_capacity_eviction() {
        let mut series = BarSeries::with_capacity("BTCUSDT", Timeframe::Hour1, 2);

        series.push(Bar::new(1, 10.0, 11.0, 9.0, 10.5, 100.0));
        series.push(Bar::new(2, 10.5, 12.0, 10.0, 11.5, 100.0));
        series.push(Bar::new(3, 11.5, 13.0, 11.0, 12.5, 100.0));

        assert_eq!(series.len(), 2);
        assert_eq!(series.get(0).unwrap().timestamp, 2);
        assert_eq!(series.last().unwrap().timestamp, 3);
    }

    #[test]
    fn test_series_field_extraction() {
        let mut series = BarSeries::new("ETHUSDT", Timeframe::Daily);
        series.extend([
            Bar::new(1, 1.0, 2.0, 0.5, 1.5, 10.0),
            Bar::new(2, 1.5, 3.0, 1.0, 2.5, 20.0),
        ]);

        assert_eq!(series.closes(), vec![1.5, 2.5]);
        assert_eq!(series.values(PriceField::High), vec![2.0, 3.0]);
        assert_eq!(series.values(PriceField::Open), vec![1.0, 1.5]);
    }

    #[test]
    fn test_series_clear() {
        let mut series: BarSeries = (0..5)
            .map(|i| Bar::new(i, 1.0, 1.0, 1.0, 1.0, 0.0))
            .collect();

        assert_eq!(series.len(), 5);
        series.clear();
        assert!(series.is_empty());
    }
}
