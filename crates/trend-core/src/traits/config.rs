//! Rule configuration trait.

use crate::error::StrategyError;

/// Configuration carried by a trend rule.
///
/// Validation runs once, at construction time; parameters are immutable
/// afterwards. A rule is never built from a configuration that fails here.
pub trait RuleConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}
