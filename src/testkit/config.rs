//! Canonical test configurations.
//!
//! Single source of truth for config samples used across tests.

use crate::application::settings::LeagueSettings;
use crate::domain::League;

/// Full configuration exercising every section.
pub const SAMPLE_TOML: &str = r#"
[logging]
level = "debug"
format = "json"

[simulation]
default_iterations = 12000
min_iterations = 10000
chunk_size = 500
max_resample_attempts = 200

[calibration]
method = "combined"
shrink_factor = 0.75
floor = 0.2
ceiling = 0.8

[staking]
kelly_multiplier = 0.25
max_stake_fraction = 0.03
min_edge = 0.01

[parlay]
default_correlation = 0.1

[leagues.nfl]
kelly_multiplier = 0.2
max_stake_fraction = 0.02

[leagues.soccer.severity]
minor = 0.02
moderate = 0.04
major = 0.08
severe = 0.12
"#;

/// Built-in league settings with a larger chunk size so tests schedule
/// fewer chunks.
pub fn league(league: League) -> LeagueSettings {
    let mut settings = LeagueSettings::defaults(league);
    settings.engine.chunk_size = 2_500;
    settings
}
