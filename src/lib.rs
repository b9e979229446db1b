//! Sharpline - simulation-driven sports betting analytics.
//!
//! Turns team baselines, injury reports and matchup signals into calibrated
//! win probabilities, market edges and fractional-Kelly stake recommendations.
//!
//! # Pipeline
//!
//! 1. [`application::context`] - raw signals into bounded multipliers
//! 2. [`application::injury`] - injury reports into baseline multipliers
//! 3. [`application::projection`] - baselines into per-game stat distributions
//! 4. [`application::simulation`] - seeded, parallel Monte Carlo games with
//!    player lines derived from every team draw
//! 5. [`application::calibration`] - raw frequencies into calibrated
//!    probabilities
//! 6. [`application::edge`] and [`application::parlay`] - prices, edges and
//!    correlated parlays
//! 7. [`application::staking`] - fractional Kelly stakes with a hard cap
//!
//! [`application::analysis::MatchupAnalyzer`] runs all of them for one game.
//!
//! # Modules
//!
//! - [`domain`] - League-agnostic types and their invariants
//! - [`port`] - Traits for external collaborators (bet ledger)
//! - [`adapter`] - Ledger implementations
//! - [`application`] - Pipeline services
//! - [`infrastructure`] - Configuration loading and logging
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use sharpline::application::MatchupAnalyzer;
//! use sharpline::domain::League;
//! use sharpline::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("sharpline.toml")?;
//!     config.init_logging();
//!     let analyzer = MatchupAnalyzer::new(config.league(League::Nba));
//!     let request = serde_json::from_str(&std::fs::read_to_string("game.json")?)?;
//!     let analysis = analyzer.analyze(&request, None)?;
//!     for record in analysis.records() {
//!         println!("{}", serde_json::to_string(record)?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
