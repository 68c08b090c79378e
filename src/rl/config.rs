//! RL Configuration
//!
//! Configuration structs for the environment adapter and reward shaping.

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_TICKERS;

/// Environment adapter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Ordered ticker catalog; must match the server's
    #[serde(default = "default_instruments")]
    pub instruments: Vec<String>,
    /// History depth L of each observation channel
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    /// Largest absolute target allocation per instrument
    #[serde(default = "default_max_leverage")]
    pub max_leverage: f64,
    /// Smallest allocation delta that produces a trade
    #[serde(default = "default_materiality_threshold")]
    pub materiality_threshold: f64,
    /// Starting account value on the server
    #[serde(default = "default_initial_balance")]
    pub initial_balance: f64,
}

fn default_instruments() -> Vec<String> {
    DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect()
}

fn default_history_len() -> usize {
    10
}

fn default_max_leverage() -> f64 {
    1.0
}

fn default_materiality_threshold() -> f64 {
    0.01
}

fn default_initial_balance() -> f64 {
    100_000_000.0
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            instruments: default_instruments(),
            history_len: default_history_len(),
            max_leverage: default_max_leverage(),
            materiality_threshold: default_materiality_threshold(),
            initial_balance: default_initial_balance(),
        }
    }
}

impl EnvConfig {
    /// Observation length: N·L·2 + N + 2
    pub fn observation_dim(&self) -> usize {
        let n = self.instruments.len();
        n * self.history_len * 2 + n + 2
    }

    /// Action length: one target allocation per instrument
    pub fn action_dim(&self) -> usize {
        self.instruments.len()
    }

    pub fn validate(&self, errors: &mut Vec<String>) {
        if self.instruments.is_empty() {
            errors.push("env.instruments must not be empty".to_string());
        }
        let mut seen = std::collections::HashSet::new();
        for ticker in &self.instruments {
            if ticker.is_empty() {
                errors.push("env.instruments contains an empty ticker".to_string());
            } else if !seen.insert(ticker.as_str()) {
                errors.push(format!("env.instruments lists {} more than once", ticker));
            }
        }
        if self.history_len == 0 {
            errors.push("env.history_len must be at least 1".to_string());
        }
        if !(self.max_leverage > 0.0 && self.max_leverage.is_finite()) {
            errors.push("env.max_leverage must be positive".to_string());
        }
        if !(self.materiality_threshold >= 0.0 && self.materiality_threshold.is_finite()) {
            errors.push("env.materiality_threshold must be non-negative".to_string());
        }
        if !(self.initial_balance > 0.0 && self.initial_balance.is_finite()) {
            errors.push("env.initial_balance must be positive".to_string());
        }
    }
}

/// Reward shaping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Volatility penalty coefficient (alpha); 0 disables shaping
    #[serde(default = "default_vol_penalty_alpha")]
    pub vol_penalty_alpha: f64,
}

fn default_vol_penalty_alpha() -> f64 {
    0.01
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            vol_penalty_alpha: default_vol_penalty_alpha(),
        }
    }
}

impl RewardConfig {
    pub fn validate(&self, errors: &mut Vec<String>) {
        if !(self.vol_penalty_alpha >= 0.0 && self.vol_penalty_alpha.is_finite()) {
            errors.push("reward.vol_penalty_alpha must be non-negative".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dims() {
        let config = EnvConfig::default();
        // 12 * 10 * 2 + 12 + 2
        assert_eq!(config.observation_dim(), 254);
        assert_eq!(config.action_dim(), 12);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = EnvConfig {
            instruments: Vec::new(),
            history_len: 0,
            max_leverage: 0.0,
            materiality_threshold: -0.1,
            initial_balance: 0.0,
        };
        let mut errors = Vec::new();
        config.validate(&mut errors);
        RewardConfig { vol_penalty_alpha: -1.0 }.validate(&mut errors);
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_duplicate_ticker_rejected() {
        let config = EnvConfig {
            instruments: vec!["BANK".to_string(), "GOLD".to_string(), "BANK".to_string()],
            ..Default::default()
        };
        let mut errors = Vec::new();
        config.validate(&mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("BANK"));
    }
}
