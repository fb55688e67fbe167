//! Indicator provider capability.

use crate::error::IndicatorError;
use crate::types::{BarSeries, MaKind, PriceField};

/// Capability to compute single indicator readings over a window of bars.
///
/// Rules consume this as an injected collaborator: the engine never owns
/// raw data access, it only asks for derived values over the history window
/// the caller assembled. `shift` selects the reading that many bars before
/// the end of the window, so `shift = 0` is the newest available value.
pub trait IndicatorProvider: Send + Sync {
    /// RSI of the close series over `period` bars, `shift` bars back.
    fn rsi(&self, series: &BarSeries, period: usize, shift: usize)
        -> Result<f64, IndicatorError>;

    /// Trailing moving average of `field` over `period` bars.
    fn moving_average(
        &self,
        series: &BarSeries,
        kind: MaKind,
        field: PriceField,
        period: usize,
    ) -> Result<f64, IndicatorError>;
}
