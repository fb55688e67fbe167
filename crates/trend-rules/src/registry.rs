//! Rule registry for config-driven construction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use trend_core::{
    error::StrategyError,
    types::{MaKind, MaOption, PriceField},
};

use crate::{
    MaConsensus, MaConsensusConfig, RsiBand, RsiBandConfig, RsiDivergence, RsiDivergenceConfig,
    TrendRule,
};

/// Information about a registered rule kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleInfo {
    /// Display name
    pub name: String,
    /// What the rule does
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry of the available rule kinds.
pub struct RuleRegistry {
    rules: HashMap<String, RuleInfo>,
}

impl RuleRegistry {
    /// Create a registry covering all built-in rules.
    pub fn new() -> Self {
        let mut rules = HashMap::new();

        rules.insert(
            "rsi_divergence".to_string(),
            RuleInfo {
                name: "RSI Divergence".to_string(),
                description: "Compares smoothed long-window RSI strength against the short window"
                    .to_string(),
                default_config: serde_json::to_value(RsiDivergenceConfig::default())
                    .unwrap_or(serde_json::Value::Null),
            },
        );

        rules.insert(
            "rsi_band".to_string(),
            RuleInfo {
                name: "RSI Band".to_string(),
                description: "Checks rolling-sum smoothed RSI range position against a band"
                    .to_string(),
                default_config: serde_json::to_value(RsiBandConfig::default())
                    .unwrap_or(serde_json::Value::Null),
            },
        );

        rules.insert(
            "ma_consensus".to_string(),
            RuleInfo {
                name: "MA Consensus".to_string(),
                description: "Requires unanimous agreement across moving-average comparisons"
                    .to_string(),
                default_config: serde_json::to_value(MaConsensusConfig {
                    options: vec![MaOption::new(MaKind::Sma, PriceField::Close, 10, 20)],
                })
                .unwrap_or(serde_json::Value::Null),
            },
        );

        Self { rules }
    }

    /// List all registered rule kinds.
    pub fn list(&self) -> Vec<&RuleInfo> {
        self.rules.values().collect()
    }

    /// Rule info by kind.
    pub fn get(&self, kind: &str) -> Option<&RuleInfo> {
        self.rules.get(kind)
    }

    /// Check whether a kind is registered.
    pub fn exists(&self, kind: &str) -> bool {
        self.rules.contains_key(kind)
    }

    /// All registered kind keys.
    pub fn names(&self) -> Vec<&String> {
        self.rules.keys().collect()
    }

    /// Build a validated rule from a JSON configuration.
    pub fn create(
        &self,
        kind: &str,
        config: serde_json::Value,
    ) -> Result<TrendRule, StrategyError> {
        match kind {
            "rsi_divergence" => {
                let config: RsiDivergenceConfig = serde_json::from_value(config)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                Ok(RsiDivergence::new(config)?.into())
            }
            "rsi_band" => {
                let config: RsiBandConfig = serde_json::from_value(config)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                Ok(RsiBand::new(config)?.into())
            }
            "ma_consensus" => {
                let config: MaConsensusConfig = serde_json::from_value(config)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                Ok(MaConsensus::new(config)?.into())
            }
            _ => Err(StrategyError::NotFound(kind.to_string())),
        }
    }

    /// Build a rule with its default configuration.
    pub fn create_default(&self, kind: &str) -> Result<TrendRule, StrategyError> {
        let info = self
            .get(kind)
            .ok_or_else(|| StrategyError::NotFound(kind.to_string()))?;
        self.create(kind, info.default_config.clone())
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
