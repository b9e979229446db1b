//! Projection model: entity baselines plus context into stat distributions.
//!
//! Two phases. [`ProjectionModel::compute_baseline`] translates team
//! baselines into the stats the league's game mechanics consume, with no
//! context applied. [`ProjectionModel::compute_context`] then scales those
//! stats by the matchup multipliers.
//!
//! Required team stats per mechanics family:
//!
//! | mechanics  | stats                                              |
//! |------------|----------------------------------------------------|
//! | possession | `pace`, `off_rating`, `def_rating` (per 100)       |
//! | drive      | `drives`, `points_per_drive`, `points_allowed_per_drive` |
//! | inning     | `runs_per_game`, `runs_allowed_per_game`           |
//! | goal       | `goals_for`, `goals_against`                       |
//!
//! Injuries weaken both ends: offensive stats are read through the entity's
//! injury multiplier, defensive stats (what the team allows) are divided by
//! it. Volume stats such as pace are left alone. The context injury factor is
//! informational and is not applied a second time here.

use tracing::debug;

use crate::domain::error::ValidationError;
use crate::domain::{
    stat, ContextFactor, Entity, League, MatchupContext, Mechanics, Projection, Side, SideProjection,
    StatDistribution,
};

const PACE: &str = "pace";
const OFF_RATING: &str = "off_rating";
const DEF_RATING: &str = "def_rating";
const DRIVES: &str = "drives";
const POINTS_PER_DRIVE: &str = "points_per_drive";
const POINTS_ALLOWED_PER_DRIVE: &str = "points_allowed_per_drive";
const RUNS_PER_GAME: &str = "runs_per_game";
const RUNS_ALLOWED_PER_GAME: &str = "runs_allowed_per_game";
const GOALS_FOR: &str = "goals_for";
const GOALS_AGAINST: &str = "goals_against";

const INNINGS: f64 = 9.0;

/// How a stat reacts to the entity's injury multiplier.
#[derive(Debug, Clone, Copy)]
enum Role {
    Volume,
    Offense,
    Defense,
}

/// Builds per-game projections from entity baselines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionModel;

impl ProjectionModel {
    pub const fn new() -> Self {
        Self
    }

    /// Full projection: baseline translation followed by context.
    ///
    /// # Errors
    ///
    /// See [`ProjectionModel::compute_baseline`] and
    /// [`ProjectionModel::compute_context`].
    pub fn project(
        &self,
        home: &Entity,
        away: &Entity,
        context: &MatchupContext,
    ) -> Result<Projection, ValidationError> {
        let baseline = self.compute_baseline(home, away)?;
        self.compute_context(&baseline, context)
    }

    /// League-specific stat translation with a neutral context.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LeagueMismatch`] if the entities belong to
    /// different leagues, [`ValidationError::MissingStat`] if a required stat
    /// is absent, and a variance/mean error for any stat that is not strictly
    /// positive in variance.
    pub fn compute_baseline(
        &self,
        home: &Entity,
        away: &Entity,
    ) -> Result<Projection, ValidationError> {
        let league = home.league();
        if away.league() != league {
            return Err(ValidationError::LeagueMismatch {
                expected: league.to_string(),
                actual: away.league().to_string(),
            });
        }

        let projection = match league.mechanics() {
            Mechanics::Possession => possession_baseline(league, home, away)?,
            Mechanics::Drive => drive_baseline(league, home, away)?,
            Mechanics::Inning => inning_baseline(league, home, away)?,
            Mechanics::Goal => goal_baseline(league, home, away)?,
        };
        debug!(league = %league, home = %home.id(), away = %away.id(), "Baseline projection computed");
        Ok(projection)
    }

    /// Apply matchup multipliers to a baseline projection.
    ///
    /// Pace scales volume (possessions, drives, goals); the side's scoring
    /// multiplier scales its scoring rate.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LeagueMismatch`] if the context belongs to a
    /// different league.
    pub fn compute_context(
        &self,
        baseline: &Projection,
        context: &MatchupContext,
    ) -> Result<Projection, ValidationError> {
        let league = baseline.league();
        if context.league() != league {
            return Err(ValidationError::LeagueMismatch {
                expected: league.to_string(),
                actual: context.league().to_string(),
            });
        }

        let pace = context.factor(ContextFactor::Pace, Side::Home);
        let projection = baseline.rescaled(|side, name, dist| {
            let factor = match (side, name) {
                (None, stat::POSSESSIONS) | (Some(_), stat::DRIVES) => pace,
                (Some(side), stat::GOALS) => pace * context.scoring_multiplier(side),
                (Some(side), _) => context.scoring_multiplier(side),
                (None, _) => 1.0,
            };
            dist.scaled(factor)
        })?;
        debug!(league = %league, pace, "Context applied to projection");
        Ok(projection)
    }
}

/// Mean and variance of one entity stat, adjusted for injuries by role.
fn read(entity: &Entity, name: &str, role: Role) -> Result<StatDistribution, ValidationError> {
    let missing = || ValidationError::MissingStat {
        entity: entity.id().to_string(),
        stat: name.to_string(),
    };
    let mean = entity.raw_baseline(name).ok_or_else(missing)?;
    let raw_variance = entity.variance(name).ok_or_else(missing)?
        / (entity.injury_multiplier() * entity.injury_multiplier());
    let raw = StatDistribution::try_new(name, mean, raw_variance)?;

    let m = entity.injury_multiplier();
    Ok(match role {
        Role::Volume => raw,
        Role::Offense => raw.scaled(m),
        Role::Defense => raw.scaled(1.0 / m),
    })
}

/// Average of two independent estimates.
fn blend(a: StatDistribution, b: StatDistribution) -> StatDistribution {
    StatDistribution {
        mean: (a.mean + b.mean) / 2.0,
        variance: (a.variance + b.variance) / 4.0,
    }
}

fn side_projection(
    entity: &Entity,
    stats: &[(&str, StatDistribution)],
) -> Result<SideProjection, ValidationError> {
    stats
        .iter()
        .try_fold(SideProjection::new(entity.id().clone()), |acc, (name, d)| {
            acc.with_stat(*name, d.mean, d.variance)
        })
}

/// Scoring rate of `offense` against `defense`: mean of what one scores and
/// the other allows.
fn matchup_rate(
    offense: &Entity,
    defense: &Entity,
    scored: &str,
    allowed: &str,
    scale: f64,
) -> Result<StatDistribution, ValidationError> {
    let rate = blend(
        read(offense, scored, Role::Offense)?,
        read(defense, allowed, Role::Defense)?,
    );
    Ok(rate.scaled(scale))
}

fn possession_baseline(
    league: League,
    home: &Entity,
    away: &Entity,
) -> Result<Projection, ValidationError> {
    let possessions = blend(read(home, PACE, Role::Volume)?, read(away, PACE, Role::Volume)?);
    let home_ppp = matchup_rate(home, away, OFF_RATING, DEF_RATING, 0.01)?;
    let away_ppp = matchup_rate(away, home, OFF_RATING, DEF_RATING, 0.01)?;

    Projection::new(
        league,
        side_projection(home, &[(stat::POINTS_PER_POSSESSION, home_ppp)])?,
        side_projection(away, &[(stat::POINTS_PER_POSSESSION, away_ppp)])?,
    )
    .with_shared(stat::POSSESSIONS, possessions.mean, possessions.variance)
}

fn drive_baseline(
    league: League,
    home: &Entity,
    away: &Entity,
) -> Result<Projection, ValidationError> {
    let side = |offense: &Entity, defense: &Entity| -> Result<SideProjection, ValidationError> {
        let drives = read(offense, DRIVES, Role::Volume)?;
        let ppd = matchup_rate(offense, defense, POINTS_PER_DRIVE, POINTS_ALLOWED_PER_DRIVE, 1.0)?;
        side_projection(
            offense,
            &[(stat::DRIVES, drives), (stat::POINTS_PER_DRIVE, ppd)],
        )
    };
    Ok(Projection::new(league, side(home, away)?, side(away, home)?))
}

fn inning_baseline(
    league: League,
    home: &Entity,
    away: &Entity,
) -> Result<Projection, ValidationError> {
    // Nine independent half innings: mean / 9, variance / 9.
    let side = |offense: &Entity, defense: &Entity| -> Result<SideProjection, ValidationError> {
        let per_game = matchup_rate(offense, defense, RUNS_PER_GAME, RUNS_ALLOWED_PER_GAME, 1.0)?;
        let per_inning = StatDistribution {
            mean: per_game.mean / INNINGS,
            variance: per_game.variance / INNINGS,
        };
        side_projection(offense, &[(stat::RUNS_PER_INNING, per_inning)])
    };
    Ok(Projection::new(league, side(home, away)?, side(away, home)?))
}

fn goal_baseline(
    league: League,
    home: &Entity,
    away: &Entity,
) -> Result<Projection, ValidationError> {
    let side = |offense: &Entity, defense: &Entity| -> Result<SideProjection, ValidationError> {
        let goals = matchup_rate(offense, defense, GOALS_FOR, GOALS_AGAINST, 1.0)?;
        side_projection(offense, &[(stat::GOALS, goals)])
    };
    Ok(Projection::new(league, side(home, away)?, side(away, home)?))
}
