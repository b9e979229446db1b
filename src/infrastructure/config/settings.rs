//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all pipeline settings.
//! Every section is optional; omitted values fall back to the documented
//! defaults. [`Config::league`] resolves the global sections plus any
//! `[leagues.<tag>]` overrides into the [`LeagueSettings`] handed to the
//! pipeline.
//!
//! # Example
//!
//! ```no_run
//! use sharpline::domain::League;
//! use sharpline::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("sharpline.toml")?;
//!     config.init_logging();
//!     let nba = config.league(League::Nba);
//!     println!("{} iterations", nba.default_iterations);
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::calibration::CalibrationConfig;
use super::league::LeagueOverrides;
use super::logging::LoggingConfig;
use super::simulation::SimulationConfig;
use super::staking::{ParlayConfig, StakingConfig};
use crate::application::calibration::CalibrationParams;
use crate::application::settings::LeagueSettings;
use crate::application::simulation::{EngineSettings, MechanicsParams, MIN_ITERATIONS};
use crate::application::staking::StakingPolicy;
use crate::domain::League;
use crate::error::{ConfigError, Result};

/// Main configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Iteration counts and RNG chunking.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Calibration method and bounds.
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Fractional Kelly and stake cap.
    #[serde(default)]
    pub staking: StakingConfig,

    #[serde(default)]
    pub parlay: ParlayConfig,

    /// Per-league overrides keyed by lower-case league tag.
    #[serde(default)]
    pub leagues: BTreeMap<League, LeagueOverrides>,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails for the global values or any league's resolved values
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Settings for one league: global values with its overrides applied.
    #[must_use]
    pub fn league(&self, league: League) -> LeagueSettings {
        let overrides = self.leagues.get(&league).copied().unwrap_or_default();

        let mut calibration: CalibrationParams = self.calibration.into();
        calibration.shrink_factor = overrides.shrink_factor.unwrap_or(calibration.shrink_factor);
        calibration.floor = overrides.floor.unwrap_or(calibration.floor);
        calibration.ceiling = overrides.ceiling.unwrap_or(calibration.ceiling);

        let mut staking: StakingPolicy = self.staking.into();
        staking.kelly_multiplier = overrides.kelly_multiplier.unwrap_or(staking.kelly_multiplier);
        staking.max_stake_fraction = overrides
            .max_stake_fraction
            .unwrap_or(staking.max_stake_fraction);

        let min_iterations = overrides
            .min_iterations
            .unwrap_or(self.simulation.min_iterations);
        let settings = LeagueSettings {
            league,
            default_iterations: overrides
                .default_iterations
                .unwrap_or(self.simulation.default_iterations)
                .max(min_iterations),
            engine: EngineSettings {
                min_iterations,
                chunk_size: self.simulation.chunk_size,
                max_resample_attempts: self.simulation.max_resample_attempts,
                mechanics: MechanicsParams::for_league(league),
            },
            calibration,
            staking,
            parlay: self.parlay.into(),
            severity: overrides.severity.unwrap_or_default(),
        };
        debug!(
            league = %league,
            overridden = self.leagues.contains_key(&league),
            "League settings resolved"
        );
        settings
    }

    /// Validate configuration values.
    ///
    /// Every league is resolved and checked, so an override can never
    /// produce settings the global section would reject.
    fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if sim.chunk_size == 0 {
            return Err(invalid("chunk_size", "must be greater than 0"));
        }
        if sim.max_resample_attempts == 0 {
            return Err(invalid("max_resample_attempts", "must be greater than 0"));
        }
        if !(self.calibration.epsilon > 0.0 && self.calibration.epsilon < 0.5) {
            return Err(invalid("epsilon", "must be between 0 and 0.5 exclusive"));
        }
        if self.staking.min_edge < 0.0 {
            return Err(invalid("min_edge", "must be 0 or greater"));
        }
        if !(-1.0..=1.0).contains(&self.parlay.default_correlation) {
            return Err(invalid("default_correlation", "must be between -1 and 1"));
        }

        for league in League::ALL {
            validate_league(&self.league(league))?;
        }
        Ok(())
    }
}

fn validate_league(settings: &LeagueSettings) -> Result<()> {
    if settings.engine.min_iterations < MIN_ITERATIONS {
        return Err(invalid(
            "min_iterations",
            format!("{}: must be at least {MIN_ITERATIONS}", settings.league),
        ));
    }

    let cal = &settings.calibration;
    if !(cal.shrink_factor > 0.0 && cal.shrink_factor <= 1.0) {
        return Err(invalid(
            "shrink_factor",
            format!("{}: must be in (0, 1]", settings.league),
        ));
    }
    if !(cal.floor > 0.0 && cal.floor < cal.ceiling && cal.ceiling < 1.0) {
        return Err(invalid(
            "floor",
            format!("{}: must satisfy 0 < floor < ceiling < 1", settings.league),
        ));
    }

    let staking = &settings.staking;
    if !(staking.kelly_multiplier > 0.0 && staking.kelly_multiplier <= 1.0) {
        return Err(invalid(
            "kelly_multiplier",
            format!("{}: must be in (0, 1]", settings.league),
        ));
    }
    if !(staking.max_stake_fraction > 0.0 && staking.max_stake_fraction <= 1.0) {
        return Err(invalid(
            "max_stake_fraction",
            format!("{}: must be in (0, 1]", settings.league),
        ));
    }

    if !settings.severity.is_valid() {
        return Err(invalid(
            "severity",
            format!(
                "{}: impacts must be within [0, 1] and non-decreasing with severity",
                settings.league
            ),
        ));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
    .into()
}
