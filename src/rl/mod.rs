//! Reinforcement learning adapter for the trading game server
//!
//! # Layout
//!
//! - **core**: history windows, observation encoding, action translation,
//!   volatility penalty math
//! - **environment**: reset/step over a [`GameServer`](crate::adapters::GameServer)
//!   plus the reward shaping wrapper
//! - **config**: environment and reward settings

pub mod config;
pub mod core;
pub mod environment;

// Config exports
pub use config::{EnvConfig, RewardConfig};

// Core exports
pub use core::{
    ActionTranslator, ActionVector, Channel, HistoryBuffer, ObservationEncoder, RewardSignal,
    VolatilityPenalty,
};

// Environment exports
pub use environment::{
    BoxSpace, Env, EnvStatus, ResetInfo, RewardShaper, ShapingInfo, StepInfo, StepResult,
    TradingEnvironment,
};
