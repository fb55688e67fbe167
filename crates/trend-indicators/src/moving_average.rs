//! Moving average indicators.

use trend_core::traits::Indicator;

/// Simple Moving Average.
///
/// Arithmetic mean over a fixed trailing window.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA over `period` values.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let divisor = self.period as f64;
        let mut out = Vec::with_capacity(data.len() - self.period + 1);
        let mut window_sum: f64 = data[..self.period].iter().sum();
        out.push(window_sum / divisor);

        for i in self.period..data.len() {
            window_sum += data[i] - data[i - self.period];
            out.push(window_sum / divisor);
        }

        out
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average.
///
/// Seeded with the SMA of the first window, then decayed with the standard
/// `2 / (period + 1)` smoothing factor.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
}

impl Ema {
    /// Create a new EMA over `period` values.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let alpha = 2.0 / (self.period as f64 + 1.0);
        let mut out = Vec::with_capacity(data.len() - self.period + 1);

        let mut ema: f64 = data[..self.period].iter().sum::<f64>() / self.period as f64;
        out.push(ema);

        for &value in &data[self.period..] {
            ema += alpha * (value - ema);
            out.push(ema);
        }

        out
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Weighted Moving Average.
///
/// Linearly increasing weights, newest value weighted heaviest.
#[derive(Debug, Clone)]
pub struct Wma {
    period: usize,
}

impl Wma {
    /// Create a new WMA over `period` values.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Wma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        // 1 + 2 + ... + n
        let weight_total = (self.period * (self.period + 1)) as f64 / 2.0;

        data.windows(self.period)
            .map(|window| {
                let weighted: f64 = window
                    .iter()
                    .zip(1..=self.period)
                    .map(|(&value, weight)| value * weight as f64)
                    .sum();
                weighted / weight_total
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "WMA"
    }
}
