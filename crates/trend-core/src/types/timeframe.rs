//! Bar interval definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interval covered by a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    #[default]
    Daily,
    #[serde(rename = "1w")]
    Weekly,
}

impl Timeframe {
    /// Interval length in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            Timeframe::Minute1 => 60,
            Timeframe::Minute5 => 300,
            Timeframe::Minute15 => 900,
            Timeframe::Hour1 => 3600,
            Timeframe::Hour4 => 14400,
            Timeframe::Daily => 86400,
            Timeframe::Weekly => 604800,
        }
    }

    /// Interval length in milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.as_secs() * 1000
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1w",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Timeframe::Minute1),
            "5m" => Ok(Timeframe::Minute5),
            "15m" => Ok(Timeframe::Minute15),
            "1h" => Ok(Timeframe::Hour1),
            "4h" => Ok(Timeframe::Hour4),
            "1d" | "daily" => Ok(Timeframe::Daily),
            "1w" | "weekly" => Ok(Timeframe::Weekly),
            _ => Err(format!("Invalid timeframe: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(Timeframe::Minute5.as_secs(), 300);
        assert_eq!(Timeframe::Hour4.as_secs(), 14400);
        assert_eq!(Timeframe::Daily.as_millis(), 86_400_000);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Timeframe::from_str("1h").unwrap(), Timeframe::Hour1);
        assert_eq!(Timeframe::from_str("daily").unwrap(), Timeframe::Daily);
        assert!(Timeframe::from_str("2h").is_err());
        assert_eq!(Timeframe::Hour1.to_string(), "1h");
    }
}
