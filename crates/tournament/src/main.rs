//! Tournament CLI
//!
//! Simulate Swiss tournaments and print their reports.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tournament::{MemoryStore, RandomOracle, TournamentConfig, TournamentResults, TournamentRunner};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Swiss tournament runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a tournament with random match results
    Simulate {
        /// Number of generated players, ignored when the config lists players
        #[arg(long, short, default_value_t = 16)]
        players: usize,
        /// TOML tournament config
        #[arg(long, short)]
        config: Option<PathBuf>,
        /// Seed for reproducible runs, overrides the config
        #[arg(long, short)]
        seed: Option<u64>,
        /// Bracket size, overrides the config
        #[arg(long, short)]
        qualifiers: Option<usize>,
        /// Write results as JSON
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the report of saved results
    Report { file: PathBuf },
    /// Show how many Swiss rounds a field of N players gets
    Rounds { players: usize },
}

fn simulate(
    players: usize,
    config: Option<PathBuf>,
    seed: Option<u64>,
    qualifiers: Option<usize>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = match config {
        Some(path) => TournamentConfig::load(&path)?,
        None => TournamentConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = Some(seed);
    }
    if let Some(qualifiers) = qualifiers {
        config.qualifiers = qualifiers;
    }
    // Pin the seed so the saved config reproduces the run
    let seed = *config.seed.get_or_insert_with(|| rand::thread_rng().gen());
    info!(seed, "seeded");

    let mut store = MemoryStore::new(config.tournament());
    if config.players.is_empty() {
        for i in 1..=players {
            store.register_player(&format!("Player {i}"))?;
        }
    } else {
        for name in &config.players {
            store.register_player(name)?;
        }
    }

    let oracle = RandomOracle::new(StdRng::seed_from_u64(seed.wrapping_add(1)));
    let results = TournamentRunner::from_config(config, oracle).run(&mut store)?;
    results.print_report();

    if let Some(path) = output {
        results
            .save(&path)
            .with_context(|| format!("failed to save results to {}", path.display()))?;
        info!(path = %path.display(), "results saved");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Simulate {
            players,
            config,
            seed,
            qualifiers,
            output,
        } => simulate(players, config, seed, qualifiers, output),
        Command::Report { file } => {
            TournamentResults::load(&file)?.print_report();
            Ok(())
        }
        Command::Rounds { players } => {
            println!("{players} players: {} Swiss rounds", swiss_core::swiss_rounds(players));
            Ok(())
        }
    }
}
