//! Moving-average comparison descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of moving average used by a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaKind {
    Sma,
    Ema,
    Wma,
}

impl fmt::Display for MaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaKind::Sma => write!(f, "SMA"),
            MaKind::Ema => write!(f, "EMA"),
            MaKind::Wma => write!(f, "WMA"),
        }
    }
}

/// Price field an indicator reads from each bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceField::Open => write!(f, "open"),
            PriceField::High => write!(f, "high"),
            PriceField::Low => write!(f, "low"),
            PriceField::Close => write!(f, "close"),
        }
    }
}

/// One moving-average comparison: an average kind, a price field, and the
/// two window bounds whose averages are compared against each other.
///
/// Immutable once constructed; the consensus rule consumes an ordered list
/// of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaOption {
    /// Kind of moving average to compute.
    pub kind: MaKind,
    /// Price field both averages read from.
    pub field: PriceField,
    /// Window length of the first (typically shorter) average.
    pub initial_bound: usize,
    /// Window length of the second (typically longer) average.
    pub final_bound: usize,
}

impl MaOption {
    /// Create a new comparison descriptor.
    pub fn new(kind: MaKind, field: PriceField, initial_bound: usize, final_bound: usize) -> Self {
        Self {
            kind,
            field,
            initial_bound,
            final_bound,
        }
    }

    /// The longer of the two window bounds, i.e. the minimum history this
    /// comparison needs before it can be evaluated.
    pub fn max_bound(&self) -> usize {
        self.initial_bound.max(self.final_bound)
    }
}

impl fmt::Display for MaOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}/{}) on {}",
            self.kind, self.initial_bound, self.final_bound, self.field
        )
    }
}
