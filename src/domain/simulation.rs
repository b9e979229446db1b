//! Simulated game outcomes and the probability queries over them.

use serde::{Deserialize, Serialize};

use super::context::Side;
use super::error::ValidationError;
use super::league::League;
use super::market::{Direction, GameOutcome, Selection};

/// One simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameDraw {
    pub home: u32,
    pub away: u32,
    /// Shared possession count, for leagues that simulate possessions.
    pub possessions: Option<f64>,
}

impl GameDraw {
    #[must_use]
    pub const fn score(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.home + self.away
    }

    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => GameOutcome::HomeWin,
            std::cmp::Ordering::Less => GameOutcome::AwayWin,
            std::cmp::Ordering::Equal => GameOutcome::Draw,
        }
    }
}

/// How a selection settles against one draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Win,
    Push,
    Loss,
}

/// Settle a value against an over/under line.
#[must_use]
pub fn settle_line(value: f64, line: f64, direction: Direction) -> Settlement {
    let diff = match direction {
        Direction::Over => value - line,
        Direction::Under => line - value,
    };
    if diff > 0.0 {
        Settlement::Win
    } else if diff < 0.0 {
        Settlement::Loss
    } else {
        Settlement::Push
    }
}

/// Settle a team-level selection against one draw.
///
/// Returns `None` for player props, which need player-level draws.
#[must_use]
pub fn settle_game(selection: &Selection, draw: &GameDraw) -> Option<Settlement> {
    let settlement = match selection {
        Selection::Moneyline { outcome } => {
            if draw.outcome() == *outcome {
                Settlement::Win
            } else {
                Settlement::Loss
            }
        }
        Selection::Spread { side, line } => {
            let margin = f64::from(draw.score(*side)) - f64::from(draw.score(side.opponent()));
            settle_line(margin, -line, Direction::Over)
        }
        Selection::Total { direction, line } => {
            settle_line(f64::from(draw.total()), *line, *direction)
        }
        Selection::PlayerProp { .. } => return None,
    };
    Some(settlement)
}

/// Win / push / loss frequencies of a selection. Sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionProbability {
    pub win: f64,
    pub push: f64,
    pub loss: f64,
}

impl SelectionProbability {
    pub(crate) fn from_counts(win: usize, push: usize, loss: usize) -> Self {
        let n = (win + push + loss).max(1) as f64;
        Self {
            win: win as f64 / n,
            push: push as f64 / n,
            loss: loss as f64 / n,
        }
    }

    /// Probability of winning given the bet does not push.
    ///
    /// This is the figure compared against the market, since a push returns
    /// the stake. A selection that always pushes has no win probability and
    /// returns 0.
    #[must_use]
    pub fn conditional_win(&self) -> f64 {
        let decided = self.win + self.loss;
        if decided <= 0.0 {
            0.0
        } else {
            self.win / decided
        }
    }
}

/// Mutually exclusive game-result probabilities. Sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub away_win: f64,
    pub draw: f64,
}

impl OutcomeProbabilities {
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.home_win + self.away_win + self.draw
    }
}

/// Sample mean and variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub mean: f64,
    pub variance: f64,
}

impl Moments {
    /// Moments of a sample, using the unbiased (n - 1) variance.
    pub fn of(values: impl Iterator<Item = f64>) -> Self {
        let mut n = 0usize;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        for x in values {
            n += 1;
            let delta = x - mean;
            mean += delta / n as f64;
            m2 += delta * (x - mean);
        }
        let variance = if n > 1 { m2 / (n - 1) as f64 } else { 0.0 };
        Self { mean, variance }
    }
}

/// Serializable digest of a simulation, without per-draw payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub league: League,
    pub iterations: usize,
    pub seed: u64,
    pub outcomes: OutcomeProbabilities,
    pub home_score: Moments,
    pub away_score: Moments,
}

/// Probability queries shared by plain and correlated results.
pub trait ProbabilityQuery {
    /// Number of simulated games.
    fn iterations(&self) -> usize;

    /// Seed the run was drawn from.
    fn seed(&self) -> u64;

    /// Win / push / loss frequencies of a selection.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the selection cannot be evaluated
    /// against this result (e.g. a player prop with no allocation).
    fn probability(&self, selection: &Selection) -> Result<SelectionProbability, ValidationError>;
}

/// N independent simulated games for one projection.
///
/// Large; pass by value or by reference rather than cloning.
#[derive(Debug)]
pub struct SimulationResult {
    league: League,
    draws: Vec<GameDraw>,
    seed: u64,
}

impl SimulationResult {
    pub(crate) fn new(league: League, draws: Vec<GameDraw>, seed: u64) -> Self {
        Self {
            league,
            draws,
            seed,
        }
    }

    pub const fn league(&self) -> League {
        self.league
    }

    pub fn draws(&self) -> &[GameDraw] {
        &self.draws
    }

    /// Home win / away win / draw frequencies.
    pub fn outcome_probabilities(&self) -> OutcomeProbabilities {
        let (mut home, mut away, mut draw) = (0usize, 0usize, 0usize);
        for d in &self.draws {
            match d.outcome() {
                GameOutcome::HomeWin => home += 1,
                GameOutcome::AwayWin => away += 1,
                GameOutcome::Draw => draw += 1,
            }
        }
        let n = self.draws.len().max(1) as f64;
        OutcomeProbabilities {
            home_win: home as f64 / n,
            away_win: away as f64 / n,
            draw: draw as f64 / n,
        }
    }

    /// Mean and variance of one side's score.
    pub fn score_moments(&self, side: Side) -> Moments {
        Moments::of(self.draws.iter().map(|d| f64::from(d.score(side))))
    }

    /// Mean and variance of the combined score.
    pub fn total_moments(&self) -> Moments {
        Moments::of(self.draws.iter().map(|d| f64::from(d.total())))
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            league: self.league,
            iterations: self.draws.len(),
            seed: self.seed,
            outcomes: self.outcome_probabilities(),
            home_score: self.score_moments(Side::Home),
            away_score: self.score_moments(Side::Away),
        }
    }

    pub(crate) fn validate_selection(&self, selection: &Selection) -> Result<(), ValidationError> {
        selection.validate()?;
        if let Selection::Moneyline {
            outcome: GameOutcome::Draw,
        } = selection
        {
            if !self.league.allows_draw() {
                return Err(ValidationError::DrawNotPossible {
                    league: self.league.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl ProbabilityQuery for SimulationResult {
    fn iterations(&self) -> usize {
        self.draws.len()
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn probability(&self, selection: &Selection) -> Result<SelectionProbability, ValidationError> {
        self.validate_selection(selection)?;
        if let Selection::PlayerProp { player, stat, .. } = selection {
            return Err(ValidationError::UnknownPlayer {
                player: player.to_string(),
                stat: stat.clone(),
            });
        }
        let (mut win, mut push, mut loss) = (0usize, 0usize, 0usize);
        for draw in &self.draws {
            match settle_game(selection, draw) {
                Some(Settlement::Win) => win += 1,
                Some(Settlement::Push) => push += 1,
                Some(Settlement::Loss) | None => loss += 1,
            }
        }
        Ok(SelectionProbability::from_counts(win, push, loss))
    }
}
