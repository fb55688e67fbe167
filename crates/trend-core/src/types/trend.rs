//! Trend classification output.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Directional classification emitted by a trend rule.
///
/// "No signal" is not a variant: it is `None` in an `Option<Trend>`, the
/// normal outcome while a rule is still accumulating history or when its
/// inputs disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
}

impl Trend {
    /// Classify the relation between a faster and a slower reading.
    ///
    /// Greater means `Bullish`, less means `Bearish`. Equal or incomparable
    /// (NaN) readings carry no signal.
    pub fn from_cross(fast: f64, slow: f64) -> Option<Trend> {
        match fast.partial_cmp(&slow)? {
            Ordering::Greater => Some(Trend::Bullish),
            Ordering::Less => Some(Trend::Bearish),
            Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "bullish"),
            Trend::Bearish => write!(f, "bearish"),
        }
    }
}
