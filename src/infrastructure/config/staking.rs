//! Stake sizing and parlay configuration.

use serde::Deserialize;

use crate::application::parlay::{ParlayParams, DEFAULT_CORRELATION};
use crate::application::staking::{
    StakingPolicy, DEFAULT_KELLY_MULTIPLIER, DEFAULT_MAX_STAKE_FRACTION,
};

/// `[staking]` section.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StakingConfig {
    /// Fraction of full Kelly (0.25 = quarter Kelly).
    #[serde(default = "default_kelly_multiplier")]
    pub kelly_multiplier: f64,
    /// Hard cap as a fraction of bankroll.
    #[serde(default = "default_max_stake_fraction")]
    pub max_stake_fraction: f64,
    /// Per-unit expected value a bet must beat.
    #[serde(default)]
    pub min_edge: f64,
}

const fn default_kelly_multiplier() -> f64 {
    DEFAULT_KELLY_MULTIPLIER
}

const fn default_max_stake_fraction() -> f64 {
    DEFAULT_MAX_STAKE_FRACTION
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            kelly_multiplier: default_kelly_multiplier(),
            max_stake_fraction: default_max_stake_fraction(),
            min_edge: 0.0,
        }
    }
}

impl From<StakingConfig> for StakingPolicy {
    fn from(config: StakingConfig) -> Self {
        Self {
            kelly_multiplier: config.kelly_multiplier,
            max_stake_fraction: config.max_stake_fraction,
            min_edge: config.min_edge,
        }
    }
}

/// `[parlay]` section.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ParlayConfig {
    /// Average leg correlation assumed when none was simulated.
    #[serde(default = "default_correlation")]
    pub default_correlation: f64,
}

const fn default_correlation() -> f64 {
    DEFAULT_CORRELATION
}

impl Default for ParlayConfig {
    fn default() -> Self {
        Self {
            default_correlation: default_correlation(),
        }
    }
}

impl From<ParlayConfig> for ParlayParams {
    fn from(config: ParlayConfig) -> Self {
        Self {
            default_correlation: config.default_correlation,
        }
    }
}
