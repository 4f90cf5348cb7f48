//! Drift Binary
//!
//! Plays a drift walk one decision at a time, searching before each move.
//!
//! Options: --config <file.json>, --seed, --budget, --rounds, --json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use rollout_mcts::{DriftBuilder, DriftRules, MCTSSearch, SearchConfig};

#[derive(Parser, Debug)]
#[command(about = "Play a drift walk with Monte Carlo Tree Search")]
struct Args {
    /// JSON file with `search`, `rules` and `rounds` sections.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the search seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the iterations per decision.
    #[arg(long)]
    budget: Option<u32>,

    /// Override the number of decisions to play.
    #[arg(long)]
    rounds: Option<u32>,

    /// Print each decision as a JSON line.
    #[arg(long)]
    json: bool,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
struct RunConfig {
    search: SearchConfig,
    rules: DriftRules,
    rounds: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            rules: DriftRules::default(),
            rounds: 10,
        }
    }
}

impl RunConfig {
    fn load(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => Self::default(),
        };
        if let Some(seed) = args.seed {
            config.search.seed = seed;
        }
        if let Some(budget) = args.budget {
            config.search.computation_budget = budget;
        }
        if let Some(rounds) = args.rounds {
            config.rounds = rounds;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = RunConfig::load(&args)?;
    log::info!("starting drift with {:?}", config);

    let root = DriftBuilder::new().rules(config.rules).build()?;
    let mut search = MCTSSearch::new(root, config.search)?;

    let decisions = search.play(config.rounds)?;
    for (i, decision) in decisions.iter().enumerate() {
        if args.json {
            println!("{}", serde_json::to_string(decision)?);
        } else {
            println!("Play round: {}", i + 1);
            println!("choose node: {}", decision);
        }
    }
    Ok(())
}
