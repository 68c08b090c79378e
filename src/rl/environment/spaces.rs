//! Space descriptors for observations and actions

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned box, the only space shape this environment uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    pub low: f32,
    pub high: f32,
    pub shape: Vec<usize>,
}

impl BoxSpace {
    pub fn new(low: f32, high: f32, shape: Vec<usize>) -> Self {
        Self { low, high, shape }
    }

    /// Number of scalar components
    pub fn dim(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_bounded(&self) -> bool {
        self.low.is_finite() && self.high.is_finite()
    }

    pub fn contains(&self, values: &[f32]) -> bool {
        values.len() == self.dim() && values.iter().all(|v| *v >= self.low && *v <= self.high)
    }

    /// Uniform sample; unbounded spaces sample zeros
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f32> {
        if !self.is_bounded() || self.low >= self.high {
            let fill = if self.low.is_finite() { self.low } else { 0.0 };
            return vec![fill; self.dim()];
        }
        (0..self.dim())
            .map(|_| rng.gen_range(self.low..=self.high))
            .collect()
    }
}
