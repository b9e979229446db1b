//! League game mechanics: turning stat draws into a final score.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::distribution::StatSampler;
use crate::domain::{stat, GameDraw, League, Mechanics, Projection, Side};
use crate::error::{Error, SimulationError};

const TOUCHDOWN_POINTS: u32 = 7;
const FIELD_GOAL_POINTS: u32 = 3;
/// No offense converts every drive.
const MAX_DRIVE_SCORE_PROBABILITY: f64 = 0.95;

/// Tunable rules of the league mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MechanicsParams {
    /// Length of one overtime period as a fraction of regulation.
    pub overtime_fraction: f64,
    /// Overtime periods played before a tie is broken by coin flip.
    pub max_overtimes: u32,
    /// Share of scoring drives that end in a touchdown.
    pub touchdown_share: f64,
    /// Sudden-death drives played before a tie is broken by coin flip.
    pub max_sudden_death_drives: u32,
    pub regulation_innings: u32,
    /// Extra innings played before a tie is broken by coin flip.
    pub max_extra_innings: u32,
}

impl MechanicsParams {
    /// Default rules for a league.
    #[must_use]
    pub fn for_league(league: League) -> Self {
        let overtime_fraction = match league {
            League::Nba => 5.0 / 48.0,
            League::Wnba | League::Ncaab => 5.0 / 40.0,
            _ => 0.0,
        };
        Self {
            overtime_fraction,
            max_overtimes: 4,
            touchdown_share: 0.58,
            max_sudden_death_drives: 8,
            regulation_innings: 9,
            max_extra_innings: 10,
        }
    }
}

/// Samplers for one projection, arranged by mechanics family.
///
/// Side arrays are indexed `[home, away]`.
#[derive(Debug, Clone)]
enum Model {
    Possession {
        possessions: StatSampler,
        ppp: [StatSampler; 2],
    },
    Drive {
        drives: [StatSampler; 2],
        ppd: [StatSampler; 2],
    },
    Inning {
        runs: [StatSampler; 2],
    },
    Goal {
        goals: [StatSampler; 2],
        means: [f64; 2],
        allows_draw: bool,
    },
}

/// A compiled game simulator for one projection.
#[derive(Debug, Clone)]
pub struct GameModel {
    model: Model,
    params: MechanicsParams,
    max_attempts: usize,
}

impl GameModel {
    /// Build samplers for every stat the league's mechanics read.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing stat and a simulation error
    /// for a distribution that cannot be sampled.
    pub fn build(
        projection: &Projection,
        params: MechanicsParams,
        max_attempts: usize,
    ) -> Result<Self, Error> {
        let sides = |name: &str, count: bool| -> Result<[StatSampler; 2], Error> {
            let sampler = |side: Side| -> Result<StatSampler, Error> {
                let dist = projection.stat(side, name)?;
                let sampler = if count {
                    StatSampler::count(name, dist)?
                } else {
                    StatSampler::continuous(name, dist, 0.0)?
                };
                Ok(sampler)
            };
            Ok([sampler(Side::Home)?, sampler(Side::Away)?])
        };

        let league = projection.league();
        let model = match league.mechanics() {
            Mechanics::Possession => Model::Possession {
                possessions: StatSampler::continuous(
                    stat::POSSESSIONS,
                    projection.shared(stat::POSSESSIONS)?,
                    0.0,
                )?,
                ppp: sides(stat::POINTS_PER_POSSESSION, false)?,
            },
            Mechanics::Drive => Model::Drive {
                drives: sides(stat::DRIVES, false)?,
                ppd: sides(stat::POINTS_PER_DRIVE, false)?,
            },
            Mechanics::Inning => Model::Inning {
                runs: sides(stat::RUNS_PER_INNING, true)?,
            },
            Mechanics::Goal => Model::Goal {
                goals: sides(stat::GOALS, true)?,
                means: [
                    projection.stat(Side::Home, stat::GOALS)?.mean,
                    projection.stat(Side::Away, stat::GOALS)?.mean,
                ],
                allows_draw: league.allows_draw(),
            },
        };
        Ok(Self {
            model,
            params,
            max_attempts,
        })
    }

    /// Simulate one game.
    ///
    /// # Errors
    ///
    /// Propagates [`SimulationError::ResampleExhausted`] from the samplers.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GameDraw, SimulationError> {
        match &self.model {
            Model::Possession { possessions, ppp } => self.possession_game(rng, possessions, ppp),
            Model::Drive { drives, ppd } => self.drive_game(rng, drives, ppd),
            Model::Inning { runs } => self.inning_game(rng, runs),
            Model::Goal {
                goals,
                means,
                allows_draw,
            } => self.goal_game(rng, goals, *means, *allows_draw),
        }
    }

    fn possession_game<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        possessions: &StatSampler,
        ppp: &[StatSampler; 2],
    ) -> Result<GameDraw, SimulationError> {
        let attempts = self.max_attempts;
        let regulation = possessions.sample(rng, attempts)?;
        let mut total = regulation;
        let mut score = [0u32; 2];
        for (side, sampler) in ppp.iter().enumerate() {
            score[side] = points(regulation * sampler.sample(rng, attempts)?);
        }

        let mut periods = 0;
        while score[0] == score[1] && periods < self.params.max_overtimes {
            let length = regulation * self.params.overtime_fraction;
            for (side, sampler) in ppp.iter().enumerate() {
                score[side] += points(length * sampler.sample(rng, attempts)?);
            }
            total += length;
            periods += 1;
        }
        break_tie(rng, &mut score, 1);

        Ok(GameDraw {
            home: score[0],
            away: score[1],
            possessions: Some(total),
        })
    }

    fn drive_game<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        drives: &[StatSampler; 2],
        ppd: &[StatSampler; 2],
    ) -> Result<GameDraw, SimulationError> {
        let attempts = self.max_attempts;
        let share = self.params.touchdown_share;
        let mut score = [0u32; 2];
        let mut p_score = [0.0; 2];

        for side in 0..2 {
            let n = drives[side].sample(rng, attempts)?.round() as u32;
            p_score[side] = drive_score_probability(ppd[side].sample(rng, attempts)?, share);
            for _ in 0..n {
                score[side] += drive_points(rng, p_score[side], share);
            }
        }

        if score[0] == score[1] {
            let first = usize::from(rng.gen_bool(0.5));
            for i in 0..self.params.max_sudden_death_drives as usize {
                let side = (first + i) % 2;
                let points = drive_points(rng, p_score[side], share);
                if points > 0 {
                    score[side] += points;
                    break;
                }
            }
        }
        break_tie(rng, &mut score, FIELD_GOAL_POINTS);

        Ok(GameDraw {
            home: score[0],
            away: score[1],
            possessions: None,
        })
    }

    fn inning_game<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        runs: &[StatSampler; 2],
    ) -> Result<GameDraw, SimulationError> {
        let attempts = self.max_attempts;
        let [home_runs, away_runs] = runs;
        let (mut home, mut away) = (0u32, 0u32);

        for inning in 1..=self.params.regulation_innings {
            away += away_runs.sample_count(rng, attempts)?;
            // Home team skips the bottom of the last inning when ahead.
            if inning == self.params.regulation_innings && home > away {
                break;
            }
            home += home_runs.sample_count(rng, attempts)?;
        }

        let mut extra = 0;
        while home == away && extra < self.params.max_extra_innings {
            away += away_runs.sample_count(rng, attempts)?;
            home += home_runs.sample_count(rng, attempts)?;
            extra += 1;
        }
        let mut score = [home, away];
        break_tie(rng, &mut score, 1);

        Ok(GameDraw {
            home: score[0],
            away: score[1],
            possessions: None,
        })
    }

    fn goal_game<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        goals: &[StatSampler; 2],
        means: [f64; 2],
        allows_draw: bool,
    ) -> Result<GameDraw, SimulationError> {
        let attempts = self.max_attempts;
        let mut score = [
            goals[0].sample_count(rng, attempts)?,
            goals[1].sample_count(rng, attempts)?,
        ];

        if score[0] == score[1] && !allows_draw {
            // One overtime goal, weighted by scoring rates.
            let rate = means[0] + means[1];
            let p_home = if rate > 0.0 { means[0] / rate } else { 0.5 };
            let winner = if rng.gen::<f64>() < p_home { 0 } else { 1 };
            score[winner] += 1;
        }

        Ok(GameDraw {
            home: score[0],
            away: score[1],
            possessions: None,
        })
    }
}

fn points(expected: f64) -> u32 {
    expected.round().max(0.0) as u32
}

/// Probability a drive scores, given expected points per drive.
///
/// Chosen so that `p * (7 r + 3 (1 - r))` equals the expected points.
#[must_use]
pub fn drive_score_probability(points_per_drive: f64, touchdown_share: f64) -> f64 {
    let points_per_score = f64::from(TOUCHDOWN_POINTS) * touchdown_share
        + f64::from(FIELD_GOAL_POINTS) * (1.0 - touchdown_share);
    (points_per_drive / points_per_score).clamp(0.0, MAX_DRIVE_SCORE_PROBABILITY)
}

fn drive_points<R: Rng + ?Sized>(rng: &mut R, p_score: f64, touchdown_share: f64) -> u32 {
    if rng.gen::<f64>() >= p_score {
        0
    } else if rng.gen::<f64>() < touchdown_share {
        TOUCHDOWN_POINTS
    } else {
        FIELD_GOAL_POINTS
    }
}

/// Award `points` to a random side if still level.
fn break_tie<R: Rng + ?Sized>(rng: &mut R, score: &mut [u32; 2], points: u32) {
    if score[0] == score[1] {
        score[usize::from(rng.gen_bool(0.5))] += points;
    }
}
