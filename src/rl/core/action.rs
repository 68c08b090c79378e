//! Action Space
//!
//! Continuous target-allocation actions and their translation into trade
//! instructions against the current holdings.

use serde::{Deserialize, Serialize};

use crate::domain::{InstrumentCatalog, PlayerState, ServerState, TradeInstruction};
use crate::error::{Result, TradefestError};
use crate::rl::core::state::allocation_ratios;

/// Signed target allocation per instrument, in catalog order.
///
/// `+0.5` means "hold a long position worth half of total asset value",
/// `-0.2` a short worth a fifth of it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionVector(Vec<f32>);

impl ActionVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// All-zero targets (flatten every position)
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Clamp each component to `[-max_leverage, max_leverage]`; NaN becomes 0
    pub fn clamped(values: &[f32], max_leverage: f32) -> Self {
        Self(
            values
                .iter()
                .map(|v| {
                    if v.is_nan() {
                        0.0
                    } else {
                        v.clamp(-max_leverage, max_leverage)
                    }
                })
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f32>> for ActionVector {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

/// Maps target allocations to trades.
///
/// For each instrument the delta between target and current allocation is
/// computed; deltas strictly above the materiality threshold become a trade
/// sized to close the gap at the latest price. Candidates come back in
/// catalog order.
#[derive(Debug, Clone)]
pub struct ActionTranslator {
    catalog: InstrumentCatalog,
    max_leverage: f64,
    materiality_threshold: f64,
}

impl ActionTranslator {
    pub fn new(catalog: InstrumentCatalog, max_leverage: f64, materiality_threshold: f64) -> Self {
        Self {
            catalog,
            max_leverage,
            materiality_threshold,
        }
    }

    pub fn catalog(&self) -> &InstrumentCatalog {
        &self.catalog
    }

    pub fn max_leverage(&self) -> f64 {
        self.max_leverage
    }

    /// Every trade that would move holdings toward `action`.
    ///
    /// Returns nothing when the total asset value is zero or missing, since
    /// no trade can be sized against it.
    pub fn translate(
        &self,
        action: &ActionVector,
        server: &ServerState,
        player: &PlayerState,
    ) -> Result<Vec<TradeInstruction>> {
        if action.len() != self.catalog.len() {
            return Err(TradefestError::Validation(format!(
                "action has {} components, expected {}",
                action.len(),
                self.catalog.len()
            )));
        }

        let Some(total) = player.usable_total_value() else {
            return Ok(Vec::new());
        };

        let current = allocation_ratios(&self.catalog, server, player);
        let mut trades = Vec::new();

        for ((instrument, target), current) in self
            .catalog
            .iter()
            .zip(action.as_slice())
            .zip(current)
        {
            let target = if target.is_nan() {
                0.0
            } else {
                (*target as f64).clamp(-self.max_leverage, self.max_leverage)
            };
            let delta = target - current;
            if delta.abs() <= self.materiality_threshold {
                continue;
            }

            let ticker = instrument.as_str();
            let Some(price) = server.latest_price(ticker).filter(|p| *p > 0.0 && p.is_finite())
            else {
                continue;
            };

            let qty = (delta.abs() * total.abs() / price).floor();
            if !(qty >= 1.0 && qty.is_finite()) {
                continue;
            }
            let qty = qty as u64;

            trades.push(if delta > 0.0 {
                TradeInstruction::buy(ticker, qty)
            } else {
                TradeInstruction::sell(ticker, qty)
            });
        }

        Ok(trades)
    }

    /// The single trade forwarded per tick: the first candidate, if any
    pub fn next_trade(
        &self,
        action: &ActionVector,
        server: &ServerState,
        player: &PlayerState,
    ) -> Result<Option<TradeInstruction>> {
        Ok(self.translate(action, server, player)?.into_iter().next())
    }
}
