//! Momentum indicators.

use trend_core::traits::Indicator;

/// Relative Strength Index.
///
/// Bounded 0–100 momentum oscillator over recent price changes, using
/// Wilder's smoothing for the average gain and loss.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI over `period` price changes.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Wilder smoothing: seed with the plain average, then
    /// `avg = (avg * (n - 1) + value) / n`.
    fn smooth(&self, values: &[f64]) -> Vec<f64> {
        if values.len() < self.period {
            return vec![];
        }

        let n = self.period as f64;
        let mut out = Vec::with_capacity(values.len() - self.period + 1);
        let mut avg = values[..self.period].iter().sum::<f64>() / n;
        out.push(avg);

        for &value in &values[self.period..] {
            avg = (avg * (n - 1.0) + value) / n;
            out.push(avg);
        }

        out
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        let mut gains = Vec::with_capacity(data.len() - 1);
        let mut losses = Vec::with_capacity(data.len() - 1);

        for pair in data.windows(2) {
            let change = pair[1] - pair[0];
            gains.push(change.max(0.0));
            losses.push((-change).max(0.0));
        }

        let avg_gains = self.smooth(&gains);
        let avg_losses = self.smooth(&losses);

        avg_gains
            .iter()
            .zip(&avg_losses)
            .map(|(&gain, &loss)| {
                if loss == 0.0 {
                    100.0
                } else {
                    100.0 - 100.0 / (1.0 + gain / loss)
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        // One extra point to form the first price change.
        self.period + 1
    }

    fn name(&self) -> &str {
        "RSI"
    }
}
