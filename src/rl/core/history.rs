//! Rolling observation history
//!
//! Fixed-depth FIFO windows, one per instrument and channel.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Signal channels tracked per instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Price normalized by the latest price
    Price,
    /// 1.0 while an active event names the instrument
    Event,
}

impl Channel {
    /// Value every slot holds after `init`
    pub fn baseline(self) -> f32 {
        match self {
            Channel::Price => 1.0,
            Channel::Event => 0.0,
        }
    }
}

/// Per-instrument rolling windows for both channels.
///
/// Every window holds exactly `depth` values at all times. Instruments are
/// addressed by catalog index; an index outside the catalog panics.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    depth: usize,
    prices: Vec<VecDeque<f32>>,
    events: Vec<VecDeque<f32>>,
}

impl HistoryBuffer {
    /// Create a buffer already filled with the baseline
    pub fn new(num_instruments: usize, depth: usize) -> Self {
        let mut buffer = Self {
            depth,
            prices: vec![VecDeque::with_capacity(depth + 1); num_instruments],
            events: vec![VecDeque::with_capacity(depth + 1); num_instruments],
        };
        buffer.init();
        buffer
    }

    /// Reset every window to the channel baseline
    pub fn init(&mut self) {
        let depth = self.depth;
        for window in &mut self.prices {
            window.clear();
            window.extend(std::iter::repeat(Channel::Price.baseline()).take(depth));
        }
        for window in &mut self.events {
            window.clear();
            window.extend(std::iter::repeat(Channel::Event.baseline()).take(depth));
        }
    }

    /// Append a sample, evicting the oldest
    pub fn push(&mut self, instrument: usize, channel: Channel, value: f32) {
        let depth = self.depth;
        if depth == 0 {
            return;
        }
        let window = self.window_mut(instrument, channel);
        window.push_back(value);
        while window.len() > depth {
            window.pop_front();
        }
    }

    /// The window contents, oldest first
    pub fn snapshot(&self, instrument: usize, channel: Channel) -> Vec<f32> {
        self.window(instrument, channel).iter().copied().collect()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn num_instruments(&self) -> usize {
        self.prices.len()
    }

    fn window(&self, instrument: usize, channel: Channel) -> &VecDeque<f32> {
        match channel {
            Channel::Price => &self.prices[instrument],
            Channel::Event => &self.events[instrument],
        }
    }

    fn window_mut(&mut self, instrument: usize, channel: Channel) -> &mut VecDeque<f32> {
        match channel {
            Channel::Price => &mut self.prices[instrument],
            Channel::Event => &mut self.events[instrument],
        }
    }
}
