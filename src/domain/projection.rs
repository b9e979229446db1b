//! Per-game projected stat distributions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::context::Side;
use super::error::ValidationError;
use super::id::EntityId;
use super::league::League;

/// Names of the stats the game mechanics read from a projection.
pub mod stat {
    /// Game-level possession count (basketball).
    pub const POSSESSIONS: &str = "possessions";
    /// Points scored per possession.
    pub const POINTS_PER_POSSESSION: &str = "points_per_possession";
    /// Offensive drives per side (football).
    pub const DRIVES: &str = "drives";
    /// Points scored per drive.
    pub const POINTS_PER_DRIVE: &str = "points_per_drive";
    /// Runs scored per half inning (baseball).
    pub const RUNS_PER_INNING: &str = "runs_per_inning";
    /// Goals per game (hockey, soccer).
    pub const GOALS: &str = "goals";
}

/// Mean and variance of one projected stat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatDistribution {
    pub mean: f64,
    pub variance: f64,
}

impl StatDistribution {
    /// Validate and build a distribution.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMean`] for negative or non-finite means
    /// and [`ValidationError::NonPositiveVariance`] for zero, negative, or
    /// non-finite variances.
    pub fn try_new(stat: &str, mean: f64, variance: f64) -> Result<Self, ValidationError> {
        if !mean.is_finite() || mean < 0.0 {
            return Err(ValidationError::InvalidMean {
                stat: stat.to_string(),
                mean,
            });
        }
        if !variance.is_finite() || variance <= 0.0 {
            return Err(ValidationError::NonPositiveVariance {
                stat: stat.to_string(),
                variance,
            });
        }
        Ok(Self { mean, variance })
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Distribution of `factor * X`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            mean: self.mean * factor,
            variance: self.variance * factor * factor,
        }
    }
}

/// Projected stats for one side of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideProjection {
    entity: EntityId,
    stats: BTreeMap<String, StatDistribution>,
}

impl SideProjection {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            stats: BTreeMap::new(),
        }
    }

    /// Add a validated stat.
    ///
    /// # Errors
    ///
    /// Propagates [`StatDistribution::try_new`] failures.
    pub fn with_stat(
        mut self,
        stat: impl Into<String>,
        mean: f64,
        variance: f64,
    ) -> Result<Self, ValidationError> {
        let stat = stat.into();
        let dist = StatDistribution::try_new(&stat, mean, variance)?;
        self.stats.insert(stat, dist);
        Ok(self)
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    pub fn get(&self, stat: &str) -> Option<&StatDistribution> {
        self.stats.get(stat)
    }

    pub fn stats(&self) -> impl Iterator<Item = (&str, &StatDistribution)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Projection for one game: per-side stats plus shared game-level stats.
///
/// Every stat is guaranteed to have strictly positive variance; the
/// constructors reject anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    league: League,
    home: SideProjection,
    away: SideProjection,
    shared: BTreeMap<String, StatDistribution>,
}

impl Projection {
    pub fn new(league: League, home: SideProjection, away: SideProjection) -> Self {
        Self {
            league,
            home,
            away,
            shared: BTreeMap::new(),
        }
    }

    /// Add a validated game-level stat (e.g. possessions).
    ///
    /// # Errors
    ///
    /// Propagates [`StatDistribution::try_new`] failures.
    pub fn with_shared(
        mut self,
        stat: impl Into<String>,
        mean: f64,
        variance: f64,
    ) -> Result<Self, ValidationError> {
        let stat = stat.into();
        let dist = StatDistribution::try_new(&stat, mean, variance)?;
        self.shared.insert(stat, dist);
        Ok(self)
    }

    pub const fn league(&self) -> League {
        self.league
    }

    pub const fn side(&self, side: Side) -> &SideProjection {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Look up a side stat.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingStat`] if the side lacks the stat.
    pub fn stat(&self, side: Side, stat: &str) -> Result<StatDistribution, ValidationError> {
        let projection = self.side(side);
        projection
            .get(stat)
            .copied()
            .ok_or_else(|| ValidationError::MissingStat {
                entity: projection.entity().to_string(),
                stat: stat.to_string(),
            })
    }

    /// Look up a game-level stat.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingStat`] if the stat is absent.
    pub fn shared(&self, stat: &str) -> Result<StatDistribution, ValidationError> {
        self.shared
            .get(stat)
            .copied()
            .ok_or_else(|| ValidationError::MissingStat {
                entity: "game".to_string(),
                stat: stat.to_string(),
            })
    }

    /// Rebuild the projection with every stat passed through `f`.
    ///
    /// `f` receives the side (`None` for game-level stats), the stat name and
    /// the current distribution. The results are validated again.
    ///
    /// # Errors
    ///
    /// Returns the first [`StatDistribution::try_new`] failure.
    pub fn rescaled<F>(&self, mut f: F) -> Result<Self, ValidationError>
    where
        F: FnMut(Option<Side>, &str, StatDistribution) -> StatDistribution,
    {
        let mut rebuild = |side: Option<Side>,
                           stats: &BTreeMap<String, StatDistribution>|
         -> Result<BTreeMap<String, StatDistribution>, ValidationError> {
            stats
                .iter()
                .map(|(name, dist)| {
                    let next = f(side, name, *dist);
                    StatDistribution::try_new(name, next.mean, next.variance)
                        .map(|d| (name.clone(), d))
                })
                .collect()
        };

        let home = rebuild(Some(Side::Home), &self.home.stats)?;
        let away = rebuild(Some(Side::Away), &self.away.stats)?;
        let shared = rebuild(None, &self.shared)?;
        Ok(Self {
            league: self.league,
            home: SideProjection {
                entity: self.home.entity.clone(),
                stats: home,
            },
            away: SideProjection {
                entity: self.away.entity.clone(),
                stats: away,
            },
            shared,
        })
    }
}
