//! Volatility-penalized reward wrapper
//!
//! Replaces the wrapped environment's reward with `raw - penalty`, where the
//! penalty grows with the step's swing in total asset value.

use async_trait::async_trait;
use tracing::warn;

use super::{BoxSpace, Env, ResetInfo, ShapingInfo, StepResult};
use crate::error::Result;
use crate::rl::config::RewardConfig;
use crate::rl::core::{ActionVector, VolatilityPenalty};

/// Wraps an environment and subtracts a volatility penalty from its reward.
///
/// Observations, termination and spaces pass through untouched.
pub struct RewardShaper<E> {
    inner: E,
    penalty: VolatilityPenalty,
    initial_balance: f64,
    prev_total_value: f64,
    cumulative_raw_return: f64,
}

impl<E: Env> RewardShaper<E> {
    pub fn new(inner: E, config: &RewardConfig, initial_balance: f64) -> Self {
        Self {
            inner,
            penalty: VolatilityPenalty::from_config(config, initial_balance),
            initial_balance,
            prev_total_value: initial_balance,
            cumulative_raw_return: 0.0,
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    pub fn prev_total_value(&self) -> f64 {
        self.prev_total_value
    }

    /// Sum of unshaped rewards since the last reset
    pub fn cumulative_raw_return(&self) -> f64 {
        self.cumulative_raw_return
    }
}

#[async_trait]
impl<E: Env> Env for RewardShaper<E> {
    async fn reset(&mut self) -> Result<(Vec<f32>, ResetInfo)> {
        // Cleared before the inner reset so a failed reset leaves both layers
        // waiting for a fresh episode
        self.prev_total_value = self.initial_balance;
        self.cumulative_raw_return = 0.0;
        self.inner.reset().await
    }

    async fn step(&mut self, action: &ActionVector) -> Result<StepResult> {
        let mut result = self.inner.step(action).await?;
        let raw = result.reward;

        let (current_value, value_estimated) = match result.info.response.total_value {
            Some(value) if value.is_finite() => (value, false),
            _ => {
                let estimate = self.prev_total_value * (1.0 + raw);
                warn!(
                    step = result.info.step,
                    estimate, "step response carried no totalValue; extrapolating from reward"
                );
                (estimate, true)
            }
        };

        let signal = self.penalty.shape(raw, self.prev_total_value, current_value);
        self.cumulative_raw_return += raw;

        result.info.shaping = Some(ShapingInfo {
            signal,
            previous_value: self.prev_total_value,
            current_value,
            value_estimated,
            cumulative_raw_return: self.cumulative_raw_return,
        });
        result.reward = signal.total;
        self.prev_total_value = current_value;

        Ok(result)
    }

    fn observation_space(&self) -> BoxSpace {
        self.inner.observation_space()
    }

    fn action_space(&self) -> BoxSpace {
        self.inner.action_space()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InfoResponse, MockGameServer, ResetResponse, StepResponse};
    use crate::domain::{PlayerState, ServerState};
    use crate::error::TradefestError;
    use crate::rl::config::EnvConfig;
    use crate::rl::environment::testing::ScriptedServer;
    use crate::rl::environment::{EnvStatus, TradingEnvironment};

    const INITIAL: f64 = 100_000_000.0;

    fn player() -> PlayerState {
        PlayerState {
            cash: INITIAL,
            total_value: Some(INITIAL),
            ..Default::default()
        }
    }

    fn step(reward: f64, total: Option<f64>) -> StepResponse {
        StepResponse {
            reward,
            done: false,
            observation: ServerState::default(),
            total_value: total,
        }
    }

    fn shaped(
        server: &ScriptedServer,
        alpha: f64,
    ) -> RewardShaper<TradingEnvironment<ScriptedServer>> {
        let env = TradingEnvironment::new(server.clone(), EnvConfig::default()).expect("env");
        RewardShaper::new(
            env,
            &RewardConfig {
                vol_penalty_alpha: alpha,
            },
            INITIAL,
        )
    }

    #[tokio::test]
    async fn test_zero_alpha_passes_reward_through() {
        let server = ScriptedServer::new(ServerState::default(), player());
        for (reward, total) in [
            (0.02, 102_000_000.0),
            (-0.05, 96_900_000.0),
            (0.0, 96_900_000.0),
        ] {
            server.push_step(step(reward, Some(total)));
        }
        let mut env = shaped(&server, 0.0);
        env.reset().await.expect("reset");

        for expected in [0.02, -0.05, 0.0] {
            let result = env.step(&ActionVector::zeros(12)).await.expect("step");
            assert_eq!(result.reward, expected);
            let shaping = result.info.shaping.expect("shaping info");
            assert_eq!(shaping.signal.penalty, 0.0);
        }
    }

    #[tokio::test]
    async fn test_penalty_follows_value_swings() {
        let server = ScriptedServer::new(ServerState::default(), player());
        server.push_step(step(0.01, Some(101_000_000.0)));
        server.push_step(step(0.0, Some(101_000_000.0)));
        let mut env = shaped(&server, 0.01);
        env.reset().await.expect("reset");

        let first = env.step(&ActionVector::zeros(12)).await.expect("step");
        assert!((first.reward - 0.0099).abs() < 1e-12);
        let shaping = first.info.shaping.expect("shaping info");
        assert_eq!(shaping.previous_value, INITIAL);
        assert_eq!(shaping.current_value, 101_000_000.0);
        assert!(!shaping.value_estimated);

        // Unchanged value: no penalty on the second step
        let second = env.step(&ActionVector::zeros(12)).await.expect("step");
        assert_eq!(second.reward, 0.0);
        assert_eq!(second.info.shaping.expect("shaping info").signal.penalty, 0.0);
        assert!((env.cumulative_raw_return() - 0.01).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_missing_total_value_is_extrapolated() {
        let server = ScriptedServer::new(ServerState::default(), player());
        server.push_step(step(0.02, None));
        let mut env = shaped(&server, 0.01);
        env.reset().await.expect("reset");

        let result = env.step(&ActionVector::zeros(12)).await.expect("step");
        let shaping = result.info.shaping.expect("shaping info");
        assert!(shaping.value_estimated);
        assert!((shaping.current_value - 102_000_000.0).abs() < 1e-6);
        assert!((shaping.signal.penalty - 0.0002).abs() < 1e-12);
        assert!((env.prev_total_value() - 102_000_000.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_reset_restores_initial_balance() {
        let server = ScriptedServer::new(ServerState::default(), player());
        server.push_step(step(0.5, Some(150_000_000.0)));
        server.push_step(step(0.0, Some(INITIAL)));
        let mut env = shaped(&server, 0.01);

        env.reset().await.expect("reset");
        env.step(&ActionVector::zeros(12)).await.expect("step");
        assert_eq!(env.prev_total_value(), 150_000_000.0);

        env.reset().await.expect("reset");
        assert_eq!(env.prev_total_value(), INITIAL);
        assert_eq!(env.cumulative_raw_return(), 0.0);

        // Back at the initial balance: nothing to penalize
        let result = env.step(&ActionVector::zeros(12)).await.expect("step");
        assert_eq!(result.reward, 0.0);
    }

    #[tokio::test]
    async fn test_failed_reset_clears_shaper_state() {
        let mut server = MockGameServer::new();
        let mut resets = 0;
        server.expect_reset().times(2).returning(move || {
            resets += 1;
            if resets == 1 {
                Ok(ResetResponse::default())
            } else {
                Err(TradefestError::Server {
                    endpoint: "/reset".to_string(),
                    status: 503,
                    body: "unavailable".to_string(),
                })
            }
        });
        server
            .expect_info()
            .returning(|| Ok(InfoResponse { player: player() }));
        server
            .expect_step()
            .times(1)
            .returning(|_| Ok(step(0.1, Some(110_000_000.0))));

        let env = TradingEnvironment::new(server, EnvConfig::default()).expect("env");
        let mut env = RewardShaper::new(env, &RewardConfig::default(), INITIAL);
        env.reset().await.expect("reset");
        env.step(&ActionVector::zeros(12)).await.expect("step");
        assert_eq!(env.prev_total_value(), 110_000_000.0);

        assert!(env.reset().await.is_err());
        assert_eq!(env.prev_total_value(), INITIAL);
        assert_eq!(env.cumulative_raw_return(), 0.0);
        assert_eq!(env.inner().status(), EnvStatus::Uninitialized);

        let err = env.step(&ActionVector::zeros(12)).await.unwrap_err();
        assert!(matches!(err, TradefestError::InvalidState(_)));
    }

    #[test]
    fn test_spaces_pass_through() {
        let env = shaped(&ScriptedServer::default(), 0.01);
        assert_eq!(env.observation_space(), env.inner().observation_space());
        assert_eq!(env.action_space(), env.inner().action_space());
    }
}
