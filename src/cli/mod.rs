//! Tradefest CLI
//!
//! Commands:
//! - `tradefest info` - Show the instrument catalog and space shapes
//! - `tradefest probe` - Reset the server once and summarize the first observation
//! - `tradefest rollout` - Drive the shaped environment with a baseline policy,
//!   optionally writing the episode summaries as JSON

pub mod rollout;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use rollout::{run_rollout, write_summaries, EpisodeSummary, Policy};

use crate::adapters::HttpGameServer;
use crate::config::AppConfig;
use crate::error::Result;
use crate::rl::{RewardShaper, TradingEnvironment};

/// Trading Festival RL environment adapter
#[derive(Parser, Debug)]
#[command(name = "tradefest")]
#[command(author, version, about = "RL environment adapter for the Trading Festival game server")]
pub struct Cli {
    /// Directory holding default.toml and per-environment overrides
    #[arg(long, env = "TRADEFEST_CONFIG_DIR", default_value = "config")]
    pub config_dir: String,

    /// Override server.base_url
    #[arg(long)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the instrument catalog and observation/action shapes
    Info,

    /// Reset the server once and summarize the first observation
    Probe,

    /// Run episodes with a baseline policy
    Rollout {
        /// Number of episodes
        #[arg(short, long, default_value = "1")]
        episodes: usize,
        /// Step limit per episode (the server may finish earlier)
        #[arg(long, default_value = "500")]
        max_steps: usize,
        /// Baseline policy
        #[arg(long, value_enum, default_value = "hold")]
        policy: Policy,
        /// RNG seed for the random policy
        #[arg(long)]
        seed: Option<u64>,
        /// Also write the episode summaries to this JSON file
        #[arg(long)]
        summary_out: Option<PathBuf>,
    },
}

/// Execute a parsed command against a loaded configuration
pub async fn run(command: &Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Info => show_info(config),
        Commands::Probe => probe(config).await,
        Commands::Rollout {
            episodes,
            max_steps,
            policy,
            seed,
            summary_out,
        } => {
            let server = HttpGameServer::new(&config.server)?;
            let env = TradingEnvironment::new(server, config.env.clone())?;
            let mut env = RewardShaper::new(env, &config.reward, config.env.initial_balance);

            let summaries = run_rollout(&mut env, *episodes, *max_steps, *policy, *seed).await?;
            print_summaries(&summaries);
            if let Some(path) = summary_out {
                write_summaries(path, &summaries)?;
            }
            Ok(())
        }
    }
}

fn show_info(config: &AppConfig) -> Result<()> {
    let server = HttpGameServer::new(&config.server)?;
    let env = TradingEnvironment::new(server, config.env.clone())?;

    println!("\n=== Tradefest Environment ===\n");
    println!("Server:            {}", env.server().base_url());
    println!("Instruments ({}):", env.catalog().len());
    for (i, instrument) in env.catalog().iter().enumerate() {
        println!("  {:>2}  {}", i, instrument);
    }
    println!("History length:    {}", config.env.history_len);
    println!("Observation space: {:?}", env.observation_space().shape);
    let action = env.action_space();
    println!(
        "Action space:      {:?} in [{}, {}]",
        action.shape, action.low, action.high
    );
    println!("Volatility alpha:  {}", config.reward.vol_penalty_alpha);
    Ok(())
}

async fn probe(config: &AppConfig) -> Result<()> {
    let server = HttpGameServer::new(&config.server)?;
    let mut env = TradingEnvironment::new(server, config.env.clone())?;

    let (observation, info) = env.reset().await?;
    let dim = observation.len();
    let events = info.response.observation.impacted_tickers();

    println!("\n=== Probe ===\n");
    println!("Observation length: {}", dim);
    println!("Instruments priced: {}", info.response.observation.prices.len());
    println!("Active events:      {}", info.response.observation.active_events.len());
    if !events.is_empty() {
        let mut tickers: Vec<_> = events.into_iter().collect();
        tickers.sort_unstable();
        println!("Impacted tickers:   {}", tickers.join(", "));
    }
    println!("Cash:               {:.0}", info.player.cash);
    match info.player.total_value {
        Some(total) => println!("Total value:        {:.0}", total),
        None => println!("Total value:        (not reported)"),
    }
    if dim >= 2 {
        println!("Cash ratio:         {:.4}", observation[dim - 2]);
        println!("Gross leverage:     {:.4}", observation[dim - 1]);
    }
    Ok(())
}

fn print_summaries(summaries: &[EpisodeSummary]) {
    println!("\n=== Rollout ===\n");
    println!(
        "{:>7}  {:>6}  {:>12}  {:>12}  {:>16}  {:>5}",
        "episode", "steps", "shaped", "raw", "final value", "done"
    );
    for s in summaries {
        println!(
            "{:>7}  {:>6}  {:>12.6}  {:>12.6}  {:>16.0}  {:>5}",
            s.episode, s.steps, s.shaped_return, s.raw_return, s.final_value, s.done
        );
    }
}
