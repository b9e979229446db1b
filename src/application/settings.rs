//! Resolved per-league parameters injected into the pipeline components.

use serde::{Deserialize, Serialize};

use super::calibration::CalibrationParams;
use super::parlay::ParlayParams;
use super::simulation::{EngineSettings, MIN_ITERATIONS};
use super::staking::StakingPolicy;
use crate::domain::{League, SeverityTable};

/// Everything one league's pipeline needs, with no global state behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSettings {
    pub league: League,
    /// Iterations used when a request does not ask for a specific count.
    pub default_iterations: usize,
    pub engine: EngineSettings,
    pub calibration: CalibrationParams,
    pub staking: StakingPolicy,
    pub parlay: ParlayParams,
    pub severity: SeverityTable,
}

impl LeagueSettings {
    /// Built-in defaults for a league.
    #[must_use]
    pub fn defaults(league: League) -> Self {
        Self {
            league,
            default_iterations: MIN_ITERATIONS,
            engine: EngineSettings::for_league(league),
            calibration: CalibrationParams::default(),
            staking: StakingPolicy::default(),
            parlay: ParlayParams::default(),
            severity: SeverityTable::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CalibrationMethod;

    #[test]
    fn defaults_match_documented_values() {
        let settings = LeagueSettings::defaults(League::Nfl);
        assert_eq!(settings.default_iterations, 10_000);
        assert_eq!(settings.engine.min_iterations, 10_000);
        assert_eq!(settings.calibration.method, CalibrationMethod::Combined);
        assert_eq!(settings.calibration.floor, 0.15);
        assert_eq!(settings.calibration.ceiling, 0.85);
        assert_eq!(settings.staking.kelly_multiplier, 0.25);
        assert_eq!(settings.staking.max_stake_fraction, 0.05);
    }
}
