//! Gym-like environment over the remote game server
//!
//! [`TradingEnvironment`] drives the server through reset/step and encodes
//! observations; [`RewardShaper`] wraps any [`Env`] and replaces its reward
//! with a volatility-penalized one.

mod shaped;
mod spaces;
mod trading;

pub use shaped::RewardShaper;
pub use spaces::BoxSpace;
pub use trading::{EnvStatus, TradingEnvironment};

use async_trait::async_trait;

use crate::adapters::{ResetResponse, StepResponse};
use crate::domain::{PlayerState, TradeInstruction};
use crate::error::Result;
use crate::rl::core::{ActionVector, RewardSignal};

/// Information returned alongside the first observation of an episode
#[derive(Debug, Clone)]
pub struct ResetInfo {
    /// Raw `/reset` response
    pub response: ResetResponse,
    /// Player state the observation was built from
    pub player: PlayerState,
}

/// Additional step information
#[derive(Debug, Clone)]
pub struct StepInfo {
    /// Steps taken this episode, including this one
    pub step: usize,
    /// Trade sent to the server, `None` for a hold
    pub trade: Option<TradeInstruction>,
    /// Raw `/step` response
    pub response: StepResponse,
    /// Player state after the step
    pub player: PlayerState,
    /// Set by [`RewardShaper`]
    pub shaping: Option<ShapingInfo>,
}

/// What the reward shaper did to this step's reward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapingInfo {
    pub signal: RewardSignal,
    /// Total value before the step
    pub previous_value: f64,
    /// Total value used for the penalty
    pub current_value: f64,
    /// Whether `current_value` was extrapolated because the server omitted it
    pub value_estimated: bool,
    /// Sum of unshaped rewards this episode
    pub cumulative_raw_return: f64,
}

/// Result of taking a step in the environment
#[derive(Debug, Clone)]
pub struct StepResult {
    /// New observation after action
    pub observation: Vec<f32>,
    /// Reward signal
    pub reward: f64,
    /// Whether episode is done
    pub done: bool,
    /// Always false: no time-limit truncation is applied
    pub truncated: bool,
    /// Additional info
    pub info: StepInfo,
}

/// Reset/step contract consumed by a learning algorithm
#[async_trait]
pub trait Env: Send {
    /// Start a new episode and return its first observation
    async fn reset(&mut self) -> Result<(Vec<f32>, ResetInfo)>;

    /// Apply one action
    async fn step(&mut self, action: &ActionVector) -> Result<StepResult>;

    fn observation_space(&self) -> BoxSpace;

    fn action_space(&self) -> BoxSpace;
}
