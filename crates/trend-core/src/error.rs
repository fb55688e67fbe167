//! Error types for the trend engine.

use thiserror::Error;

/// Top-level trend engine error.
#[derive(Error, Debug)]
pub enum TrendError {
    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Rule construction and evaluation errors.
///
/// Running out of history is deliberately absent here: a rule that has not
/// accumulated its minimum window reports `Ok(None)`, not an error.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Rule not found: {0}")]
    NotFound(String),

    #[error("Degenerate divisor in {context}: window sums to zero")]
    DegenerateDivisor { context: &'static str },

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Rule error: {0}")]
    Internal(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type alias for trend engine operations.
pub type TrendResult<T> = Result<T, TrendError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn classify() -> TrendResult<()> {
        Err(StrategyError::NotFound("supertrend".into()))?
    }

    #[test]
    fn test_errors_bubble_into_umbrella() {
        let err = classify().unwrap_err();
        assert!(matches!(err, TrendError::Strategy(StrategyError::NotFound(_))));
    }

    #[test]
    fn test_indicator_error_nests_in_strategy_error() {
        let indicator = IndicatorError::InsufficientData {
            required: 15,
            available: 4,
        };
        let err: StrategyError = indicator.into();
        assert_eq!(
            err.to_string(),
            "Indicator error: Insufficient data: need 15 points, have 4"
        );
    }
}
