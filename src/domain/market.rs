use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Market-wide state published by the game server each tick.
///
/// Every field is optional on the wire; a missing price series or event list
/// deserializes to an empty collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerState {
    /// Price series per ticker, oldest first
    #[serde(default)]
    pub prices: HashMap<String, Vec<f64>>,
    /// Events currently moving prices
    #[serde(default, rename = "activeEvents")]
    pub active_events: Vec<ActiveEvent>,
    /// Whether the server's game loop is running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
}

impl ServerState {
    /// Full price series for a ticker (empty if the server sent none)
    pub fn price_series(&self, ticker: &str) -> &[f64] {
        self.prices.get(ticker).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Most recent price for a ticker
    pub fn latest_price(&self, ticker: &str) -> Option<f64> {
        self.price_series(ticker).last().copied()
    }

    /// Tickers named by any active event
    pub fn impacted_tickers(&self) -> HashSet<&str> {
        self.active_events
            .iter()
            .filter_map(|event| event.event_definition.as_ref())
            .flat_map(|definition| definition.tickers.iter())
            .map(|effect| effect.ticker.as_str())
            .collect()
    }
}

/// An event that is still decaying on the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    /// Ticks elapsed since the event fired
    #[serde(default)]
    pub tick: Option<u64>,
    #[serde(default, rename = "eventDefinition")]
    pub event_definition: Option<EventDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Instruments the event moves
    #[serde(default)]
    pub tickers: Vec<TickerEffect>,
}

/// Impact curve parameters for one ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerEffect {
    pub ticker: String,
    /// Decay time constant
    #[serde(default)]
    pub a: Option<f64>,
    /// Signed magnitude
    #[serde(default)]
    pub k: Option<f64>,
}
