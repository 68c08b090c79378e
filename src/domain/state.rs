use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Position in one ticker
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Signed quantity (negative = short)
    #[serde(default)]
    pub qty: f64,
    /// Average entry price
    #[serde(default, rename = "avgPrice")]
    pub avg_price: f64,
}

/// Account snapshot returned by `GET /info`.
///
/// Fetched fresh on every read; the environment never keeps one past the
/// step that fetched it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Cash balance (0 when omitted)
    #[serde(default)]
    pub cash: f64,
    /// Holdings keyed by ticker (tickers never traded may be missing)
    #[serde(default)]
    pub holdings: HashMap<String, Holding>,
    /// Cash plus marked-to-market positions, as computed by the server
    #[serde(default, rename = "totalValue")]
    pub total_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnl: Option<f64>,
}

impl PlayerState {
    /// Signed quantity held, 0 for tickers without a holding entry
    pub fn quantity(&self, ticker: &str) -> f64 {
        self.holdings.get(ticker).map(|h| h.qty).unwrap_or(0.0)
    }

    /// Total asset value when it is usable as a denominator
    pub fn usable_total_value(&self) -> Option<f64> {
        self.total_value.filter(|v| *v != 0.0 && v.is_finite())
    }
}
