//! Game server access
//!
//! The environment talks to the Trading Festival server only through the
//! [`GameServer`] trait, so tests can stand in for the HTTP client.

pub mod game_server;

pub use game_server::HttpGameServer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{PlayerState, ServerState, TradeInstruction};
use crate::error::Result;

/// Response to `POST /reset`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResetResponse {
    #[serde(default)]
    pub observation: ServerState,
}

/// Response to `GET /info`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoResponse {
    #[serde(default)]
    pub player: PlayerState,
}

/// Response to `POST /step`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepResponse {
    /// Raw per-step return (0 when omitted)
    #[serde(default)]
    pub reward: f64,
    /// Episode completion flag (false when omitted)
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub observation: ServerState,
    /// Total asset value after the step, when the server reports it
    #[serde(default, rename = "totalValue", skip_serializing_if = "Option::is_none")]
    pub total_value: Option<f64>,
}

/// The three calls of the RL endpoint of the game server.
///
/// Implementations make exactly one request per call and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameServer: Send + Sync {
    /// Start a new game on the server
    async fn reset(&self) -> Result<ResetResponse>;

    /// Fetch the player's current account state
    async fn info(&self) -> Result<InfoResponse>;

    /// Advance one tick, trading if `trade` is set and holding otherwise
    async fn step(&self, trade: Option<TradeInstruction>) -> Result<StepResponse>;
}

#[async_trait]
impl<T: GameServer + ?Sized> GameServer for Box<T> {
    async fn reset(&self) -> Result<ResetResponse> {
        (**self).reset().await
    }

    async fn info(&self) -> Result<InfoResponse> {
        (**self).info().await
    }

    async fn step(&self, trade: Option<TradeInstruction>) -> Result<StepResponse> {
        (**self).step(trade).await
    }
}
