//! Baseline rollouts
//!
//! Runs whole episodes through any [`Env`] with a fixed policy. Useful for
//! smoke-testing a server and for a reference return to compare learners
//! against.

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::rl::{ActionVector, BoxSpace, Env};

/// Baseline policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Always target zero allocation (all-zero action)
    Hold,
    /// Uniform sample from the action space
    Random,
}

impl Policy {
    pub fn act(&self, space: &BoxSpace, rng: &mut StdRng) -> ActionVector {
        match self {
            Policy::Hold => ActionVector::zeros(space.dim()),
            Policy::Random => ActionVector::clamped(&space.sample(rng), space.high),
        }
    }
}

/// Outcome of one episode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub steps: usize,
    /// Sum of rewards as returned by the environment
    pub shaped_return: f64,
    /// Sum of unshaped rewards when the environment reports them
    pub raw_return: f64,
    /// Total value after the last step
    pub final_value: f64,
    /// Whether the server ended the episode (false when `max_steps` hit first)
    pub done: bool,
}

/// Run `episodes` episodes of at most `max_steps` steps each
pub async fn run_rollout<E: Env>(
    env: &mut E,
    episodes: usize,
    max_steps: usize,
    policy: Policy,
    seed: Option<u64>,
) -> Result<Vec<EpisodeSummary>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let space = env.action_space();
    let mut summaries = Vec::with_capacity(episodes);

    for episode in 0..episodes {
        let (_, reset) = env.reset().await?;
        let mut summary = EpisodeSummary {
            episode,
            steps: 0,
            shaped_return: 0.0,
            raw_return: 0.0,
            final_value: reset.player.total_value.unwrap_or_default(),
            done: false,
        };

        while summary.steps < max_steps {
            let action = policy.act(&space, &mut rng);
            let result = env.step(&action).await?;

            summary.steps += 1;
            summary.shaped_return += result.reward;
            summary.raw_return += result
                .info
                .shaping
                .map(|s| s.signal.raw)
                .unwrap_or(result.reward);
            if let Some(total) = result.info.player.total_value {
                summary.final_value = total;
            }

            if result.done {
                summary.done = true;
                break;
            }
        }

        info!(
            episode,
            steps = summary.steps,
            shaped_return = summary.shaped_return,
            raw_return = summary.raw_return,
            final_value = summary.final_value,
            "episode finished"
        );
        summaries.push(summary);
    }

    Ok(summaries)
}

/// Write episode summaries as a JSON array, creating parent directories
pub fn write_summaries(path: &Path, summaries: &[EpisodeSummary]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_vec_pretty(summaries)?;
    std::fs::write(path, body)?;
    info!(path = %path.display(), episodes = summaries.len(), "rollout summary written");
    Ok(())
}
