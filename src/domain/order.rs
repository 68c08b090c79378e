use serde::{Deserialize, Serialize};

/// Trade side as the game server spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

/// Body of a `POST /step` request that trades
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeInstruction {
    pub ticker: String,
    pub side: TradeSide,
    /// Whole units; the server floors fractional quantities anyway
    pub qty: u64,
}

impl TradeInstruction {
    pub fn buy(ticker: impl Into<String>, qty: u64) -> Self {
        Self {
            ticker: ticker.into(),
            side: TradeSide::Buy,
            qty,
        }
    }

    pub fn sell(ticker: impl Into<String>, qty: u64) -> Self {
        Self {
            ticker: ticker.into(),
            side: TradeSide::Sell,
            qty,
        }
    }
}

impl std::fmt::Display for TradeInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} x{}", self.side, self.ticker, self.qty)
    }
}
