//! Normalized matchup context multipliers.
//!
//! Every factor is a multiplier around the neutral value 1.0 and is clamped
//! into its documented range on the way in, so downstream stages can rely on
//! the bounds without re-checking them.
//!
//! | factor     | scope | range        |
//! |------------|-------|--------------|
//! | pace       | game  | [0.80, 1.20] |
//! | weather    | game  | [0.70, 1.00] |
//! | efficiency | side  | [0.80, 1.20] |
//! | rest       | side  | [0.95, 1.05] |
//! | travel     | side  | [0.95, 1.00] |
//! | injury     | side  | [0.50, 1.00] |

use std::fmt;

use serde::{Deserialize, Serialize};

use super::league::League;

/// Home or away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    #[must_use]
    pub const fn opponent(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named context multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextFactor {
    Pace,
    Weather,
    Efficiency,
    Rest,
    Travel,
    Injury,
}

impl ContextFactor {
    pub const ALL: [ContextFactor; 6] = [
        ContextFactor::Pace,
        ContextFactor::Weather,
        ContextFactor::Efficiency,
        ContextFactor::Rest,
        ContextFactor::Travel,
        ContextFactor::Injury,
    ];

    /// Inclusive valid range of the multiplier.
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        match self {
            ContextFactor::Pace | ContextFactor::Efficiency => (0.8, 1.2),
            ContextFactor::Weather => (0.7, 1.0),
            ContextFactor::Rest => (0.95, 1.05),
            ContextFactor::Travel => (0.95, 1.0),
            ContextFactor::Injury => (0.5, 1.0),
        }
    }

    /// Whether the factor applies to the whole game rather than one side.
    #[must_use]
    pub const fn is_game_level(&self) -> bool {
        matches!(self, ContextFactor::Pace | ContextFactor::Weather)
    }

    /// Clamp a value into range. Non-finite values become neutral.
    #[must_use]
    pub fn bound(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 1.0;
        }
        let (lo, hi) = self.range();
        value.clamp(lo, hi)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ContextFactor::Pace => "pace",
            ContextFactor::Weather => "weather",
            ContextFactor::Efficiency => "efficiency",
            ContextFactor::Rest => "rest",
            ContextFactor::Travel => "travel",
            ContextFactor::Injury => "injury",
        }
    }
}

/// Side-specific multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideContext {
    pub efficiency: f64,
    pub rest: f64,
    pub travel: f64,
    pub injury: f64,
}

impl Default for SideContext {
    fn default() -> Self {
        Self {
            efficiency: 1.0,
            rest: 1.0,
            travel: 1.0,
            injury: 1.0,
        }
    }
}

/// Bounded multipliers describing the situation of one game.
///
/// Produced once per matchup and read-only afterwards; the `with_*`
/// methods return modified copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupContext {
    league: League,
    pace: f64,
    weather: f64,
    home: SideContext,
    away: SideContext,
}

impl MatchupContext {
    /// Context with every factor at its neutral value.
    #[must_use]
    pub fn neutral(league: League) -> Self {
        Self {
            league,
            pace: 1.0,
            weather: 1.0,
            home: SideContext::default(),
            away: SideContext::default(),
        }
    }

    #[must_use]
    pub const fn league(&self) -> League {
        self.league
    }

    /// Value of a factor for a side. Game-level factors ignore the side.
    #[must_use]
    pub fn factor(&self, factor: ContextFactor, side: Side) -> f64 {
        let ctx = self.side(side);
        match factor {
            ContextFactor::Pace => self.pace,
            ContextFactor::Weather => self.weather,
            ContextFactor::Efficiency => ctx.efficiency,
            ContextFactor::Rest => ctx.rest,
            ContextFactor::Travel => ctx.travel,
            ContextFactor::Injury => ctx.injury,
        }
    }

    #[must_use]
    pub const fn side(&self, side: Side) -> &SideContext {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Copy with one factor set, clamped into its range.
    ///
    /// Game-level factors are set for both sides regardless of `side`.
    #[must_use]
    pub fn with_factor(&self, factor: ContextFactor, side: Side, value: f64) -> Self {
        let value = factor.bound(value);
        let mut next = self.clone();
        match factor {
            ContextFactor::Pace => next.pace = value,
            ContextFactor::Weather => next.weather = value,
            _ => {
                let ctx = match side {
                    Side::Home => &mut next.home,
                    Side::Away => &mut next.away,
                };
                match factor {
                    ContextFactor::Efficiency => ctx.efficiency = value,
                    ContextFactor::Rest => ctx.rest = value,
                    ContextFactor::Travel => ctx.travel = value,
                    _ => ctx.injury = value,
                }
            }
        }
        next
    }

    /// Combined multiplier on one side's scoring rate.
    ///
    /// The injury factor is informational here: injuries are applied to
    /// entity baselines before projection and are not counted twice.
    #[must_use]
    pub fn scoring_multiplier(&self, side: Side) -> f64 {
        let ctx = self.side(side);
        ctx.efficiency * ctx.rest * ctx.travel * self.weather
    }

    /// All factors as `(factor, side, value)`, game-level factors once with `None`.
    pub fn iter(&self) -> impl Iterator<Item = (ContextFactor, Option<Side>, f64)> + '_ {
        ContextFactor::ALL.into_iter().flat_map(move |factor| {
            let sides: &[Option<Side>] = if factor.is_game_level() {
                &[None]
            } else {
                &[Some(Side::Home), Some(Side::Away)]
            };
            sides.iter().map(move |side| {
                let value = self.factor(factor, side.unwrap_or(Side::Home));
                (factor, *side, value)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_context_is_all_ones() {
        let ctx = MatchupContext::neutral(League::Nba);
        assert!(ctx.iter().all(|(_, _, v)| v == 1.0));
        assert_eq!(ctx.iter().count(), 10);
    }

    #[test]
    fn with_factor_clamps_to_range() {
        let ctx = MatchupContext::neutral(League::Nfl)
            .with_factor(ContextFactor::Pace, Side::Home, 3.0)
            .with_factor(ContextFactor::Rest, Side::Away, 0.1);
        assert_eq!(ctx.factor(ContextFactor::Pace, Side::Away), 1.2);
        assert_eq!(ctx.factor(ContextFactor::Rest, Side::Away), 0.95);
        assert_eq!(ctx.factor(ContextFactor::Rest, Side::Home), 1.0);
    }

    #[test]
    fn non_finite_values_become_neutral() {
        assert_eq!(ContextFactor::Travel.bound(f64::NAN), 1.0);
        assert_eq!(ContextFactor::Weather.bound(f64::INFINITY), 1.0);
    }

    #[test]
    fn scoring_multiplier_excludes_injury() {
        let ctx = MatchupContext::neutral(League::Nba)
            .with_factor(ContextFactor::Efficiency, Side::Home, 1.1)
            .with_factor(ContextFactor::Injury, Side::Home, 0.8);
        assert!((ctx.scoring_multiplier(Side::Home) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn opponent_flips_side() {
        assert_eq!(Side::Home.opponent(), Side::Away);
        assert_eq!(Side::Away.opponent(), Side::Home);
    }
}
