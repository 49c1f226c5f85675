//! Tournament runner for the Swiss pairing engine
//!
//! This crate provides the caller side of `swiss_core`:
//! - An in-memory player/match store implementing `StandingsView`
//! - A round loop from the first Swiss round to the podium
//! - Text and JSON reports of finished tournaments
//!
//! # Usage
//!
//! ```bash
//! # Simulate a 24-player tournament with random results
//! cargo run -p tournament -- simulate --players 24 --seed 42
//!
//! # Run from a config file and keep the results
//! cargo run -p tournament -- simulate --config open.toml --output results.json
//!
//! # Print a saved report
//! cargo run -p tournament -- report results.json
//! ```

pub mod config;
pub mod oracle;
pub mod results;
pub mod runner;
pub mod store;

pub use config::TournamentConfig;
pub use oracle::{FavoriteOracle, MatchOracle, Outcome, RandomOracle};
pub use results::{MatchEntry, RoundReport, TournamentResults};
pub use runner::TournamentRunner;
pub use store::{MatchPoints, MemoryStore, PlayerEntry, StoreError};
