//! Trading Environment for RL Training
//!
//! Provides a gym-like interface with step/reset over the remote game
//! server.

use async_trait::async_trait;
use tracing::{debug, info};

use super::{BoxSpace, Env, ResetInfo, StepInfo, StepResult};
use crate::adapters::GameServer;
use crate::domain::{InstrumentCatalog, ServerState};
use crate::error::{Result, TradefestError};
use crate::rl::config::EnvConfig;
use crate::rl::core::{ActionTranslator, ActionVector, HistoryBuffer, ObservationEncoder};

/// Lifecycle of a [`TradingEnvironment`].
///
/// ```md
/// Current State                 | Action  | Next State
/// ------------------------------|---------|-----------
/// any                           | reset() | Ready, or Uninitialized if a request fails
/// `Ready` / `Stepping`          | step()  | Stepping, or Done when the server says so
/// `Uninitialized` / `Done`      | step()  | error, state unchanged
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvStatus {
    /// Constructed, `reset()` not called yet
    Uninitialized,
    /// Episode started, no step taken
    Ready,
    /// At least one step taken, episode still running
    Stepping,
    /// Server reported completion; `reset()` required
    Done,
}

impl EnvStatus {
    pub fn can_step(&self) -> bool {
        matches!(self, Self::Ready | Self::Stepping)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Environment adapter around one game server session.
///
/// Owns the history windows, the encoder and the translator. Calls to the
/// server are strictly sequential: `reset` and `step` take `&mut self` and
/// await each request before issuing the next.
pub struct TradingEnvironment<S> {
    server: S,
    config: EnvConfig,
    encoder: ObservationEncoder,
    translator: ActionTranslator,
    history: HistoryBuffer,
    /// Latest market state seen; prices for trade sizing come from here
    market: ServerState,
    status: EnvStatus,
    step_count: usize,
    prev_total_value: f64,
}

impl<S: GameServer> TradingEnvironment<S> {
    /// Create a new trading environment
    pub fn new(server: S, config: EnvConfig) -> Result<Self> {
        let mut errors = Vec::new();
        config.validate(&mut errors);
        if !errors.is_empty() {
            return Err(TradefestError::Validation(errors.join("; ")));
        }

        let catalog = InstrumentCatalog::new(config.instruments.iter().cloned())?;
        let encoder = ObservationEncoder::new(catalog.clone(), config.history_len);
        let translator =
            ActionTranslator::new(catalog, config.max_leverage, config.materiality_threshold);
        let history = encoder.new_history();
        let prev_total_value = config.initial_balance;

        Ok(Self {
            server,
            config,
            encoder,
            translator,
            history,
            market: ServerState::default(),
            status: EnvStatus::Uninitialized,
            step_count: 0,
            prev_total_value,
        })
    }

    /// Reset the environment for a new episode
    ///
    /// Stepping stays refused until both `/reset` and `/info` succeed; a
    /// failed reset leaves history and counters untouched.
    pub async fn reset(&mut self) -> Result<(Vec<f32>, ResetInfo)> {
        self.status = EnvStatus::Uninitialized;

        let response = self.server.reset().await?;
        let player = self.server.info().await?.player;

        self.history.init();
        self.step_count = 0;
        self.prev_total_value = self.config.initial_balance;
        let observation = self
            .encoder
            .encode(&response.observation, &player, &mut self.history);
        self.market = response.observation.clone();
        self.status = EnvStatus::Ready;

        info!(
            instruments = self.encoder.catalog().len(),
            history_len = self.config.history_len,
            total_value = ?player.total_value,
            "environment reset"
        );

        Ok((observation, ResetInfo { response, player }))
    }

    /// Take a step in the environment
    pub async fn step(&mut self, action: &ActionVector) -> Result<StepResult> {
        if !self.status.can_step() {
            return Err(TradefestError::InvalidState(format!(
                "step() called while {:?}; call reset() first",
                self.status
            )));
        }

        let player = self.server.info().await?.player;
        let trade = self.translator.next_trade(action, &self.market, &player)?;

        let response = self.server.step(trade.clone()).await?;
        let player_after = self.server.info().await?.player;

        let observation = self
            .encoder
            .encode(&response.observation, &player_after, &mut self.history);
        self.market = response.observation.clone();
        self.prev_total_value = player_after
            .total_value
            .unwrap_or(self.config.initial_balance);
        self.step_count += 1;
        self.status = if response.done {
            EnvStatus::Done
        } else {
            EnvStatus::Stepping
        };

        debug!(
            step = self.step_count,
            trade = %trade.as_ref().map(|t| t.to_string()).unwrap_or_else(|| "hold".to_string()),
            reward = response.reward,
            done = response.done,
            "environment step"
        );

        Ok(StepResult {
            observation,
            reward: response.reward,
            done: response.done,
            truncated: false,
            info: StepInfo {
                step: self.step_count,
                trade,
                response,
                player: player_after,
                shaping: None,
            },
        })
    }

    pub fn observation_space(&self) -> BoxSpace {
        BoxSpace::new(
            f32::NEG_INFINITY,
            f32::INFINITY,
            vec![self.encoder.output_dim()],
        )
    }

    pub fn action_space(&self) -> BoxSpace {
        let bound = self.config.max_leverage as f32;
        BoxSpace::new(-bound, bound, vec![self.encoder.catalog().len()])
    }

    pub fn status(&self) -> EnvStatus {
        self.status
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Total value reported after the last step (initial balance after reset)
    pub fn prev_total_value(&self) -> f64 {
        self.prev_total_value
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn catalog(&self) -> &InstrumentCatalog {
        self.encoder.catalog()
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn server(&self) -> &S {
        &self.server
    }
}

#[async_trait]
impl<S: GameServer> Env for TradingEnvironment<S> {
    async fn reset(&mut self) -> Result<(Vec<f32>, ResetInfo)> {
        TradingEnvironment::reset(self).await
    }

    async fn step(&mut self, action: &ActionVector) -> Result<StepResult> {
        TradingEnvironment::step(self, action).await
    }

    fn observation_space(&self) -> BoxSpace {
        TradingEnvironment::observation_space(self)
    }

    fn action_space(&self) -> BoxSpace {
        TradingEnvironment::action_space(self)
    }
}
