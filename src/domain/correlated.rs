//! Player-level draws derived from team-level draws.
//!
//! Each player stat is a fixed share of a team-level quantity in the same
//! simulated game (the side's score or the game's possession count). Because
//! the player value is a deterministic function of the team draw rather than
//! an independent resample, any dependence between team and player markets is
//! preserved by construction, and a player's marginal distribution is simply
//! the team quantity's marginal scaled by the share.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::context::Side;
use super::error::ValidationError;
use super::id::EntityId;
use super::market::Selection;
use super::simulation::{
    settle_game, settle_line, GameDraw, Moments, ProbabilityQuery, SelectionProbability,
    Settlement, SimulationResult,
};

/// Team-level quantity a player stat is allocated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationBasis {
    /// The player's side's final score.
    Score,
    /// The game's shared possession count.
    Possessions,
}

/// Proportional-share allocation of one player stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAllocation {
    pub player: EntityId,
    pub side: Side,
    pub stat: String,
    pub basis: AllocationBasis,
    /// Fraction of the basis credited to the player, in (0, 1].
    pub share: f64,
}

impl PlayerAllocation {
    pub fn new(
        player: impl Into<EntityId>,
        side: Side,
        stat: impl Into<String>,
        basis: AllocationBasis,
        share: f64,
    ) -> Self {
        Self {
            player: player.into(),
            side,
            stat: stat.into(),
            basis,
            share,
        }
    }

    /// Player value in one simulated game.
    ///
    /// Returns `None` when the basis is possessions and the draw has none.
    #[must_use]
    pub fn derive(&self, draw: &GameDraw) -> Option<f64> {
        let basis = match self.basis {
            AllocationBasis::Score => f64::from(draw.score(self.side)),
            AllocationBasis::Possessions => draw.possessions?,
        };
        Some(self.share * basis)
    }
}

/// Check shares are in (0, 1] and do not over-allocate any basis.
///
/// Shares are summed per `(side, basis, stat)`; the same player may appear
/// with several stats but only once per stat.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAllocation`] on the first violation.
pub fn validate_allocations(allocations: &[PlayerAllocation]) -> Result<(), ValidationError> {
    let mut totals: BTreeMap<(Side, AllocationBasis, &str), f64> = BTreeMap::new();
    let mut seen: BTreeSet<(&EntityId, &str)> = BTreeSet::new();

    for alloc in allocations {
        let invalid = |reason: String| ValidationError::InvalidAllocation {
            player: alloc.player.to_string(),
            reason,
        };
        if !alloc.share.is_finite() || alloc.share <= 0.0 || alloc.share > 1.0 {
            return Err(invalid(format!("share must be in (0, 1], got {}", alloc.share)));
        }
        if !seen.insert((&alloc.player, alloc.stat.as_str())) {
            return Err(invalid(format!("duplicate allocation for stat '{}'", alloc.stat)));
        }
        let total = totals
            .entry((alloc.side, alloc.basis, alloc.stat.as_str()))
            .or_insert(0.0);
        *total += alloc.share;
        if *total > 1.0 + 1e-9 {
            return Err(invalid(format!(
                "{} shares of {} stat '{}' sum to {:.3}",
                alloc.side, alloc.basis.as_str(), alloc.stat, total
            )));
        }
    }
    Ok(())
}

impl AllocationBasis {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            AllocationBasis::Score => "score",
            AllocationBasis::Possessions => "possessions",
        }
    }
}

/// A team-level result plus consistently derived player lines.
///
/// `lines` is row-major: iteration `i`, player `j` lives at
/// `i * allocations.len() + j`.
#[derive(Debug)]
pub struct CorrelatedSimulationResult {
    base: SimulationResult,
    allocations: Vec<PlayerAllocation>,
    lines: Vec<f64>,
}

impl CorrelatedSimulationResult {
    /// Derive player lines from a finished team-level run.
    ///
    /// # Errors
    ///
    /// Fails if the allocations are invalid or reference possessions in a
    /// league that does not simulate them.
    pub fn derive(
        base: SimulationResult,
        allocations: Vec<PlayerAllocation>,
    ) -> Result<Self, ValidationError> {
        validate_allocations(&allocations)?;

        let mut lines = Vec::with_capacity(base.draws().len() * allocations.len());
        for draw in base.draws() {
            for alloc in &allocations {
                let value = alloc
                    .derive(draw)
                    .ok_or_else(|| ValidationError::InvalidAllocation {
                        player: alloc.player.to_string(),
                        reason: format!("{} does not simulate possessions", base.league()),
                    })?;
                lines.push(value);
            }
        }

        Ok(Self {
            base,
            allocations,
            lines,
        })
    }

    pub fn base(&self) -> &SimulationResult {
        &self.base
    }

    pub fn into_base(self) -> SimulationResult {
        self.base
    }

    pub fn allocations(&self) -> &[PlayerAllocation] {
        &self.allocations
    }

    fn player_index(&self, player: &EntityId, stat: &str) -> Result<usize, ValidationError> {
        self.allocations
            .iter()
            .position(|a| &a.player == player && a.stat == stat)
            .ok_or_else(|| ValidationError::UnknownPlayer {
                player: player.to_string(),
                stat: stat.to_string(),
            })
    }

    fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.lines
            .iter()
            .skip(index)
            .step_by(self.allocations.len())
            .copied()
    }

    /// All simulated values of one player stat, in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownPlayer`] without a matching allocation.
    pub fn player_values(
        &self,
        player: &EntityId,
        stat: &str,
    ) -> Result<impl Iterator<Item = f64> + '_, ValidationError> {
        let index = self.player_index(player, stat)?;
        Ok(self.column(index))
    }

    /// Mean and variance of one player stat across iterations.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownPlayer`] without a matching allocation.
    pub fn player_moments(&self, player: &EntityId, stat: &str) -> Result<Moments, ValidationError> {
        Ok(Moments::of(self.player_values(player, stat)?))
    }

    /// Settle each leg for every iteration. One `Vec` per leg.
    fn settlements(&self, legs: &[Selection]) -> Result<Vec<Vec<Settlement>>, ValidationError> {
        legs.iter()
            .map(|leg| -> Result<Vec<Settlement>, ValidationError> {
                match leg {
                    Selection::PlayerProp {
                        player,
                        stat,
                        direction,
                        line,
                    } => {
                        leg.validate()?;
                        let index = self.player_index(player, stat)?;
                        Ok(self
                            .column(index)
                            .map(|v| settle_line(v, *line, *direction))
                            .collect())
                    }
                    _ => {
                        self.base.validate_selection(leg)?;
                        Ok(self
                            .base
                            .draws()
                            .iter()
                            .map(|d| settle_game(leg, d).unwrap_or(Settlement::Loss))
                            .collect())
                    }
                }
            })
            .collect()
    }

    /// Probability that every leg wins in the same simulated game.
    ///
    /// A pushed leg counts as not winning.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyLegs`] for no legs, or any leg's
    /// validation error.
    pub fn joint_probability(&self, legs: &[Selection]) -> Result<f64, ValidationError> {
        if legs.is_empty() {
            return Err(ValidationError::EmptyLegs);
        }
        let settled = self.settlements(legs)?;
        let n = self.base.draws().len();
        let hits = (0..n)
            .filter(|&i| settled.iter().all(|leg| leg[i] == Settlement::Win))
            .count();
        Ok(hits as f64 / n.max(1) as f64)
    }

    /// Pearson (phi) correlation between two legs' win indicators.
    ///
    /// Returns 0 when either leg always or never wins, since the coefficient
    /// is undefined there.
    ///
    /// # Errors
    ///
    /// Propagates either leg's validation error.
    pub fn correlation(&self, a: &Selection, b: &Selection) -> Result<f64, ValidationError> {
        let matrix = self.correlation_matrix(&[a.clone(), b.clone()])?;
        Ok(matrix[0][1])
    }

    /// Pairwise phi correlations between all legs; diagonal is 1.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyLegs`] for no legs, or any leg's
    /// validation error.
    pub fn correlation_matrix(&self, legs: &[Selection]) -> Result<Vec<Vec<f64>>, ValidationError> {
        if legs.is_empty() {
            return Err(ValidationError::EmptyLegs);
        }
        let settled = self.settlements(legs)?;
        let n = self.base.draws().len().max(1) as f64;
        let rates: Vec<f64> = settled
            .iter()
            .map(|leg| leg.iter().filter(|s| **s == Settlement::Win).count() as f64 / n)
            .collect();

        let mut matrix = vec![vec![0.0; legs.len()]; legs.len()];
        for i in 0..legs.len() {
            matrix[i][i] = 1.0;
            for j in (i + 1)..legs.len() {
                let both = settled[i]
                    .iter()
                    .zip(&settled[j])
                    .filter(|(x, y)| **x == Settlement::Win && **y == Settlement::Win)
                    .count() as f64
                    / n;
                let (pi, pj) = (rates[i], rates[j]);
                let denom = (pi * (1.0 - pi) * pj * (1.0 - pj)).sqrt();
                let phi = if denom > 0.0 {
                    ((both - pi * pj) / denom).clamp(-1.0, 1.0)
                } else {
                    0.0
                };
                matrix[i][j] = phi;
                matrix[j][i] = phi;
            }
        }
        Ok(matrix)
    }
}

impl ProbabilityQuery for CorrelatedSimulationResult {
    fn iterations(&self) -> usize {
        self.base.iterations()
    }

    fn seed(&self) -> u64 {
        self.base.seed()
    }

    fn probability(&self, selection: &Selection) -> Result<SelectionProbability, ValidationError> {
        let Selection::PlayerProp { .. } = selection else {
            return self.base.probability(selection);
        };
        let settled = self.settlements(std::slice::from_ref(selection))?;
        let (mut win, mut push, mut loss) = (0usize, 0usize, 0usize);
        for s in &settled[0] {
            match s {
                Settlement::Win => win += 1,
                Settlement::Push => push += 1,
                Settlement::Loss => loss += 1,
            }
        }
        Ok(SelectionProbability::from_counts(win, push, loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::{Direction, GameOutcome};
    use crate::domain::League;

    fn draw(home: u32, away: u32, possessions: Option<f64>) -> GameDraw {
        GameDraw {
            home,
            away,
            possessions,
        }
    }

    fn make_base() -> SimulationResult {
        SimulationResult::new(
            League::Nba,
            vec![
                draw(110, 100, Some(100.0)),
                draw(95, 105, Some(96.0)),
                draw(120, 118, Some(104.0)),
                draw(101, 99, Some(98.0)),
            ],
            3,
        )
    }

    fn star() -> PlayerAllocation {
        PlayerAllocation::new("star", Side::Home, "points", AllocationBasis::Score, 0.25)
    }

    #[test]
    fn player_lines_are_share_of_team_score() {
        let result = CorrelatedSimulationResult::derive(make_base(), vec![star()]).unwrap();
        let values: Vec<f64> = result
            .player_values(&EntityId::new("star"), "points")
            .unwrap()
            .collect();
        assert_eq!(values, vec![27.5, 23.75, 30.0, 25.25]);
    }

    #[test]
    fn over_allocation_is_rejected() {
        let allocs = vec![
            star(),
            PlayerAllocation::new("other", Side::Home, "points", AllocationBasis::Score, 0.8),
        ];
        let err = CorrelatedSimulationResult::derive(make_base(), allocs).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAllocation { .. }));
    }

    #[test]
    fn zero_share_is_rejected() {
        let alloc = PlayerAllocation::new("x", Side::Away, "points", AllocationBasis::Score, 0.0);
        assert!(validate_allocations(&[alloc]).is_err());
    }

    #[test]
    fn possessions_basis_requires_possessions() {
        let base = SimulationResult::new(League::Nhl, vec![draw(3, 2, None)], 1);
        let alloc = PlayerAllocation::new(
            "x",
            Side::Home,
            "shots",
            AllocationBasis::Possessions,
            0.1,
        );
        assert!(CorrelatedSimulationResult::derive(base, vec![alloc]).is_err());
    }

    #[test]
    fn joint_probability_counts_same_game_hits() {
        let result = CorrelatedSimulationResult::derive(make_base(), vec![star()]).unwrap();
        let legs = [
            Selection::Moneyline {
                outcome: GameOutcome::HomeWin,
            },
            Selection::PlayerProp {
                player: EntityId::new("star"),
                stat: "points".to_string(),
                direction: Direction::Over,
                line: 26.5,
            },
        ];
        // Home wins in 0, 2, 3; star over 26.5 in 0, 2.
        assert_eq!(result.joint_probability(&legs).unwrap(), 0.5);
        let corr = result.correlation(&legs[0], &legs[1]).unwrap();
        assert!(corr > 0.0);
    }

    #[test]
    fn joint_probability_requires_legs() {
        let result = CorrelatedSimulationResult::derive(make_base(), vec![]).unwrap();
        assert_eq!(
            result.joint_probability(&[]).unwrap_err(),
            ValidationError::EmptyLegs
        );
    }

    #[test]
    fn prop_probability_via_trait() {
        let result = CorrelatedSimulationResult::derive(make_base(), vec![star()]).unwrap();
        let p = result
            .probability(&Selection::PlayerProp {
                player: EntityId::new("star"),
                stat: "points".to_string(),
                direction: Direction::Under,
                line: 30.0,
            })
            .unwrap();
        assert_eq!(p.win, 0.75);
        assert_eq!(p.push, 0.25);
    }

    #[test]
    fn degenerate_leg_has_zero_correlation() {
        let result = CorrelatedSimulationResult::derive(make_base(), vec![]).unwrap();
        let always = Selection::Total {
            direction: Direction::Over,
            line: 100.0,
        };
        let home = Selection::Moneyline {
            outcome: GameOutcome::HomeWin,
        };
        assert_eq!(result.correlation(&always, &home).unwrap(), 0.0);
    }
}
