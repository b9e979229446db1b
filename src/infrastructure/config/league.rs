//! Per-league overrides.

use serde::Deserialize;

use crate::domain::SeverityTable;

/// `[leagues.<tag>]` section. Unset fields inherit the global value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeagueOverrides {
    pub default_iterations: Option<usize>,
    pub min_iterations: Option<usize>,
    pub shrink_factor: Option<f64>,
    pub floor: Option<f64>,
    pub ceiling: Option<f64>,
    pub kelly_multiplier: Option<f64>,
    pub max_stake_fraction: Option<f64>,
    pub severity: Option<SeverityTable>,
}
