//! Windowed indicator provider.

use trend_core::error::IndicatorError;
use trend_core::traits::{Indicator, IndicatorProvider};
use trend_core::types::{BarSeries, MaKind, PriceField};

use crate::momentum::Rsi;
use crate::moving_average::{Ema, Sma, Wma};

/// Default [`IndicatorProvider`] computing readings directly over the
/// supplied bar series.
///
/// A reading at `shift` is obtained by cutting the newest `shift` bars off
/// the window and taking the last value the batch indicator produces over
/// the remainder, so successive shifts walk backwards through history.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesIndicators;

fn last_value<I>(indicator: &I, values: &[f64]) -> Result<f64, IndicatorError>
where
    I: Indicator<Output = f64>,
{
    indicator.validate_data(values)?;
    indicator
        .calculate(values)
        .last()
        .copied()
        .ok_or_else(|| {
            IndicatorError::CalculationError(format!("{} produced no output", indicator.name()))
        })
}

impl IndicatorProvider for SeriesIndicators {
    fn rsi(
        &self,
        series: &BarSeries,
        period: usize,
        shift: usize,
    ) -> Result<f64, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "RSI period must be greater than 0".into(),
            ));
        }

        let closes = series.closes();
        let required = period + shift + 1;
        if closes.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: closes.len(),
            });
        }

        last_value(&Rsi::new(period), &closes[..closes.len() - shift])
    }

    fn moving_average(
        &self,
        series: &BarSeries,
        kind: MaKind,
        field: PriceField,
        period: usize,
    ) -> Result<f64, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "moving average period must be greater than 0".into(),
            ));
        }

        let values = series.values(field);
        match kind {
            MaKind::Sma => last_value(&Sma::new(period), &values),
            MaKind::Ema => last_value(&Ema::new(period), &values),
            MaKind::Wma => last_value(&Wma::new(period), &values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trend_core::types::{Bar, Timeframe};

    fn series_from(closes: &[f64]) -> BarSeries {
        let mut series = BarSeries::new("TEST", Timeframe::Daily);
        for (i, &close) in closes.iter().enumerate() {
            series.push(Bar::new(
                i as i64 * 1000,
                close,
                close + 1.0,
                close - 1.0,
                close,
                100.0,
            ));
        }
        series
    }

    fn zigzag(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 100.0 + (i as f64 * 1.3).sin() * 6.0)
            .collect()
    }

    #[test]
    fn test_rsi_newest_matches_batch() {
        let closes = zigzag(30);
        let series = series_from(&closes);
        let provider = SeriesIndicators;

        let reading = provider.rsi(&series, 7, 0).unwrap();
        let batch = Rsi::new(7).calculate(&closes);
        assert!((reading - batch.last().unwrap()).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_shift_walks_backwards() {
        let closes = zigzag(30);
        let series = series_from(&closes);
        let provider = SeriesIndicators;

        let shifted = provider.rsi(&series, 7, 3).unwrap();
        let batch = Rsi::new(7).calculate(&closes[..27]);
        assert!((shifted - batch.last().unwrap()).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let series = series_from(&zigzag(6));
        let provider = SeriesIndicators;

        let err = provider.rsi(&series, 5, 1).unwrap_err();
        assert!(matches!(
            err,
            IndicatorError::InsufficientData {
                required: 7,
                available: 6
            }
        ));
    }

    #[test]
    fn test_rsi_zero_period_rejected() {
        let series = series_from(&zigzag(10));
        let provider = SeriesIndicators;

        assert!(matches!(
            provider.rsi(&series, 0, 0),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_moving_average_reads_chosen_field() {
        let series = series_from(&[10.0, 12.0, 14.0]);
        let provider = SeriesIndicators;

        let on_close = provider
            .moving_average(&series, MaKind::Sma, PriceField::Close, 3)
            .unwrap();
        assert!((on_close - 12.0).abs() < 1e-10);

        // Highs sit one above the closes.
        let on_high = provider
            .moving_average(&series, MaKind::Sma, PriceField::High, 3)
            .unwrap();
        assert!((on_high - 13.0).abs() < 1e-10);
    }

    #[test]
    fn test_moving_average_kinds_agree_with_batch() {
        let closes = zigzag(25);
        let series = series_from(&closes);
        let provider = SeriesIndicators;

        for (kind, batch) in [
            (MaKind::Sma, Sma::new(6).calculate(&closes)),
            (MaKind::Ema, Ema::new(6).calculate(&closes)),
            (MaKind::Wma, Wma::new(6).calculate(&closes)),
        ] {
            let reading = provider
                .moving_average(&series, kind, PriceField::Close, 6)
                .unwrap();
            assert!((reading - batch.last().unwrap()).abs() < 1e-10);
        }
    }

    #[test]
    fn test_moving_average_insufficient_data() {
        let series = series_from(&[1.0, 2.0]);
        let provider = SeriesIndicators;

        assert!(matches!(
            provider.moving_average(&series, MaKind::Wma, PriceField::Close, 5),
            Err(IndicatorError::InsufficientData { .. })
        ));
    }
}
