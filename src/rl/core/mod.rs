//! Core RL abstractions
//!
//! History windows, observation encoding, action translation and reward
//! shaping math.

pub mod action;
pub mod history;
pub mod reward;
pub mod state;

pub use action::{ActionTranslator, ActionVector};
pub use history::{Channel, HistoryBuffer};
pub use reward::{RewardSignal, VolatilityPenalty};
pub use state::{
    allocation_ratios, cash_ratio, gross_leverage, normalize_price_window, ObservationEncoder,
};
