//! State Representation
//!
//! Builds the flat observation vector from server state, player state and
//! the rolling history windows.
//!
//! Layout, in catalog order:
//!
//! ```text
//! [inst_0 price x L][inst_0 event x L] ... [inst_N-1 price x L][inst_N-1 event x L]
//! [alloc_0 .. alloc_N-1][cash_ratio][gross_leverage]
//! ```

use crate::domain::{InstrumentCatalog, PlayerState, ServerState};
use crate::rl::core::history::{Channel, HistoryBuffer};

/// Encodes server and player snapshots into fixed-length observations
#[derive(Debug, Clone)]
pub struct ObservationEncoder {
    catalog: InstrumentCatalog,
    history_len: usize,
}

impl ObservationEncoder {
    pub fn new(catalog: InstrumentCatalog, history_len: usize) -> Self {
        Self {
            catalog,
            history_len,
        }
    }

    pub fn catalog(&self) -> &InstrumentCatalog {
        &self.catalog
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// A history buffer shaped for this encoder
    pub fn new_history(&self) -> HistoryBuffer {
        HistoryBuffer::new(self.catalog.len(), self.history_len)
    }

    /// Observation length: N·L·2 + N + 2
    pub fn output_dim(&self) -> usize {
        let n = self.catalog.len();
        n * self.history_len * 2 + n + 2
    }

    /// Encode one observation.
    ///
    /// Pushes this tick's normalized price and event flag for every
    /// instrument into `history` and emits the windows read back from it.
    /// Missing prices, holdings or total value fall back to neutral values;
    /// the output length never changes.
    pub fn encode(
        &self,
        server: &ServerState,
        player: &PlayerState,
        history: &mut HistoryBuffer,
    ) -> Vec<f32> {
        debug_assert_eq!(history.depth(), self.history_len);

        let mut features = Vec::with_capacity(self.output_dim());
        let impacted = server.impacted_tickers();

        for (index, instrument) in self.catalog.iter().enumerate() {
            let ticker = instrument.as_str();

            let window = normalize_price_window(server.price_series(ticker), self.history_len);
            let latest = window.last().copied().unwrap_or(1.0);
            history.push(index, Channel::Price, latest as f32);
            features.extend(history.snapshot(index, Channel::Price));

            let impact = if impacted.contains(ticker) { 1.0 } else { 0.0 };
            history.push(index, Channel::Event, impact);
            features.extend(history.snapshot(index, Channel::Event));
        }

        let allocations = allocation_ratios(&self.catalog, server, player);
        features.extend(allocations.iter().map(|a| *a as f32));
        features.push(cash_ratio(player) as f32);
        features.push(gross_leverage(&allocations) as f32);

        debug_assert_eq!(
            features.len(),
            self.output_dim(),
            "Feature count mismatch: {} vs {}",
            features.len(),
            self.output_dim()
        );

        features
    }
}

/// Last `depth` prices divided by the latest one, left-padded with 1.0.
///
/// An empty series counts as a single neutral point. A zero or non-finite
/// latest price makes every point 1.0.
pub fn normalize_price_window(series: &[f64], depth: usize) -> Vec<f64> {
    let start = series.len().saturating_sub(depth);
    let slice = &series[start..];

    let current = slice
        .last()
        .copied()
        .filter(|p| *p != 0.0 && p.is_finite());

    let mut window: Vec<f64> = match current {
        Some(current) => slice.iter().map(|p| p / current).collect(),
        None => vec![1.0; slice.len().max(1)],
    };

    if window.len() < depth {
        let pad = depth - window.len();
        window.splice(0..0, std::iter::repeat(1.0).take(pad));
    }
    let excess = window.len().saturating_sub(depth);
    window.drain(..excess);

    window
}

/// Position value over total asset value per instrument, in catalog order.
///
/// 0.0 for every instrument when the total value is zero or missing.
pub fn allocation_ratios(
    catalog: &InstrumentCatalog,
    server: &ServerState,
    player: &PlayerState,
) -> Vec<f64> {
    let Some(total) = player.usable_total_value() else {
        return vec![0.0; catalog.len()];
    };

    catalog
        .iter()
        .map(|instrument| {
            let ticker = instrument.as_str();
            let price = server.latest_price(ticker).unwrap_or(0.0);
            let ratio = player.quantity(ticker) * price / total;
            if ratio.is_finite() {
                ratio
            } else {
                0.0
            }
        })
        .collect()
}

/// Cash over total asset value (0.0 when the total is zero or missing)
pub fn cash_ratio(player: &PlayerState) -> f64 {
    player
        .usable_total_value()
        .map(|total| player.cash / total)
        .filter(|ratio| ratio.is_finite())
        .unwrap_or(0.0)
}

/// Sum of absolute allocation ratios
pub fn gross_leverage(allocations: &[f64]) -> f64 {
    allocations.iter().map(|a| a.abs()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActiveEvent, EventDefinition, Holding, TickerEffect};
    use std::collections::HashMap;

    fn catalog() -> InstrumentCatalog {
        InstrumentCatalog::new(["BANK", "SEMI", "GOLD"]).expect("catalog")
    }

    fn server_with_prices(prices: &[(&str, Vec<f64>)]) -> ServerState {
        ServerState {
            prices: prices
                .iter()
                .map(|(t, p)| (t.to_string(), p.clone()))
                .collect(),
            ..Default::default()
        }
    }

    fn player(cash: f64, total: Option<f64>, holdings: &[(&str, f64)]) -> PlayerState {
        PlayerState {
            cash,
            holdings: holdings
                .iter()
                .map(|(t, qty)| {
                    (
                        t.to_string(),
                        Holding {
                            qty: *qty,
                            avg_price: 0.0,
                        },
                    )
                })
                .collect::<HashMap<_, _>>(),
            total_value: total,
            pnl: None,
        }
    }

    #[test]
    fn test_normalize_pads_oldest_side() {
        let window = normalize_price_window(&[100.0, 200.0], 4);
        assert_eq!(window, vec![1.0, 1.0, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_keeps_most_recent() {
        let window = normalize_price_window(&[1.0, 2.0, 4.0, 8.0], 2);
        assert_eq!(window, vec![0.5, 1.0]);
    }

    #[test]
    fn test_normalize_empty_and_zero() {
        assert_eq!(normalize_price_window(&[], 3), vec![1.0, 1.0, 1.0]);
        assert_eq!(normalize_price_window(&[5.0, 0.0], 3), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_encoder_output_dim() {
        let encoder = ObservationEncoder::new(catalog(), 5);
        let mut history = encoder.new_history();

        let full = server_with_prices(&[
            ("BANK", vec![2300.0, 2310.0]),
            ("SEMI", vec![12000.0; 30]),
            ("GOLD", vec![20000.0]),
        ]);
        let obs = encoder.encode(&full, &player(1.0, Some(1.0), &[]), &mut history);
        assert_eq!(obs.len(), 3 * 5 * 2 + 3 + 2);

        let obs = encoder.encode(&ServerState::default(), &PlayerState::default(), &mut history);
        assert_eq!(obs.len(), encoder.output_dim());
    }

    #[test]
    fn test_latest_price_value_is_one() {
        let encoder = ObservationEncoder::new(catalog(), 4);
        let mut history = encoder.new_history();
        let server = server_with_prices(&[("BANK", vec![2300.0, 2250.0, 2400.0])]);

        let obs = encoder.encode(&server, &PlayerState::default(), &mut history);
        // BANK price window occupies the first L slots
        assert_eq!(obs[3], 1.0);
        assert_eq!(history.snapshot(0, Channel::Price)[3], 1.0);
    }

    #[test]
    fn test_event_channel_tracks_active_events() {
        let encoder = ObservationEncoder::new(catalog(), 3);
        let mut history = encoder.new_history();
        let mut server = server_with_prices(&[]);
        server.active_events.push(ActiveEvent {
            tick: Some(0),
            event_definition: Some(EventDefinition {
                id: "gold-rush".to_string(),
                name: "Gold rush".to_string(),
                tickers: vec![TickerEffect {
                    ticker: "GOLD".to_string(),
                    a: Some(2.0),
                    k: Some(0.1),
                }],
            }),
        });

        let obs = encoder.encode(&server, &PlayerState::default(), &mut history);
        let l = 3;
        // GOLD is the third instrument: price at [4l..5l), event at [5l..6l)
        assert_eq!(&obs[5 * l..6 * l], &[0.0, 0.0, 1.0]);
        // BANK event window unchanged
        assert_eq!(&obs[l..2 * l], &[0.0, 0.0, 0.0]);

        server.active_events.clear();
        encoder.encode(&server, &PlayerState::default(), &mut history);
        assert_eq!(history.snapshot(2, Channel::Event), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_allocation_cash_and_leverage() {
        let encoder = ObservationEncoder::new(catalog(), 1);
        let mut history = encoder.new_history();
        let server = server_with_prices(&[
            ("BANK", vec![2500.0]),
            ("SEMI", vec![1000.0]),
            ("GOLD", vec![20000.0]),
        ]);
        let player = player(
            6_000_000.0,
            Some(10_000_000.0),
            &[("BANK", 2000.0), ("SEMI", -1000.0)],
        );

        let obs = encoder.encode(&server, &player, &mut history);
        let tail = &obs[3 * 2..];
        assert_eq!(tail.len(), 5);
        assert!((tail[0] - 0.5).abs() < 1e-6);
        assert!((tail[1] + 0.1).abs() < 1e-6);
        assert_eq!(tail[2], 0.0);
        assert!((tail[3] - 0.6).abs() < 1e-6);
        assert!((tail[4] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_zero_total_value_is_well_defined() {
        let encoder = ObservationEncoder::new(catalog(), 2);
        let mut history = encoder.new_history();
        let server = server_with_prices(&[("BANK", vec![2500.0])]);
        let player = player(1000.0, Some(0.0), &[("BANK", 10.0)]);

        let obs = encoder.encode(&server, &player, &mut history);
        assert!(obs.iter().all(|v| v.is_finite()));
        let tail = &obs[3 * 2 * 2..];
        assert_eq!(tail, &[0.0, 0.0, 0.0, 0.0, 0.0]);
    }
}
