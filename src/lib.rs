pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod rl;

pub use adapters::{GameServer, HttpGameServer};
pub use config::AppConfig;
pub use domain::{InstrumentCatalog, PlayerState, ServerState, TradeInstruction, TradeSide};
pub use error::{Result, TradefestError};
pub use rl::{
    ActionVector, Env, EnvConfig, RewardConfig, RewardShaper, StepResult, TradingEnvironment,
};
