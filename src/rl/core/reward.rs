//! Reward Functions
//!
//! Volatility-penalized reward shaping:
//!
//! ```text
//! penalty = alpha * |v_t - v_{t-1}| / initial_balance
//! shaped  = raw - penalty
//! ```

use serde::{Deserialize, Serialize};

// Re-export config
pub use crate::rl::config::RewardConfig;

/// Reward signal components
///
/// Keeping the raw reward next to the penalty lets callers see which term
/// drove a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardSignal {
    /// Reward as returned by the server
    pub raw: f64,
    /// Volatility penalty (non-negative)
    pub penalty: f64,
    /// raw - penalty
    pub total: f64,
}

impl RewardSignal {
    /// Create from just the raw reward
    pub fn unshaped(raw: f64) -> Self {
        Self {
            raw,
            penalty: 0.0,
            total: raw,
        }
    }
}

/// Penalizes swings in total asset value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityPenalty {
    alpha: f64,
    initial_balance: f64,
}

impl VolatilityPenalty {
    pub fn new(alpha: f64, initial_balance: f64) -> Self {
        Self {
            alpha,
            initial_balance,
        }
    }

    pub fn from_config(config: &RewardConfig, initial_balance: f64) -> Self {
        Self::new(config.vol_penalty_alpha, initial_balance)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// alpha * |current - previous| / initial_balance
    pub fn penalty(&self, previous_value: f64, current_value: f64) -> f64 {
        if self.alpha == 0.0 || self.initial_balance <= 0.0 {
            return 0.0;
        }
        let penalty = self.alpha * (current_value - previous_value).abs() / self.initial_balance;
        if penalty.is_finite() {
            penalty
        } else {
            0.0
        }
    }

    pub fn shape(&self, raw: f64, previous_value: f64, current_value: f64) -> RewardSignal {
        let penalty = self.penalty(previous_value, current_value);
        RewardSignal {
            raw,
            penalty,
            total: raw - penalty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL: f64 = 100_000_000.0;

    #[test]
    fn test_zero_alpha_is_unshaped() {
        let shaper = VolatilityPenalty::new(0.0, INITIAL);
        for (raw, prev, cur) in [
            (0.0123, INITIAL, INITIAL * 1.3),
            (-0.5, INITIAL, 1.0),
            (1e-9, 0.0, f64::MAX),
        ] {
            let signal = shaper.shape(raw, prev, cur);
            assert_eq!(signal.total, raw);
            assert_eq!(signal, RewardSignal::unshaped(raw));
        }
    }

    #[test]
    fn test_penalty_value() {
        let shaper = VolatilityPenalty::new(0.01, INITIAL);
        // |101M - 100M| / 100M * 0.01
        let signal = shaper.shape(0.01, INITIAL, INITIAL + 1_000_000.0);
        assert!((signal.penalty - 0.0001).abs() < 1e-12);
        assert!((signal.total - 0.0099).abs() < 1e-12);
    }

    #[test]
    fn test_penalty_non_negative_and_monotonic() {
        let shaper = VolatilityPenalty::new(0.5, INITIAL);
        let mut last = 0.0;
        for delta in [0.0, 1.0, 10.0, 1_000.0, 1_000_000.0, 50_000_000.0] {
            let up = shaper.penalty(INITIAL, INITIAL + delta);
            let down = shaper.penalty(INITIAL, INITIAL - delta);
            assert!(up >= 0.0);
            assert_eq!(up, down);
            assert!(up >= last);
            last = up;
        }
    }

    #[test]
    fn test_unchanged_value_has_no_penalty() {
        let shaper = VolatilityPenalty::new(3.0, INITIAL);
        assert_eq!(shaper.penalty(123_456.0, 123_456.0), 0.0);
    }
}
