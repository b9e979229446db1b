//! Bookmaker markets and the selections they price.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::context::Side;
use super::error::ValidationError;
use super::id::{EntityId, MarketId};
use super::odds::Odds;

/// Market category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    Moneyline,
    Spread,
    Total,
    Prop,
}

/// Over or under a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Over,
    Under,
}

/// Final game result from the perspective of the home team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    HomeWin,
    AwayWin,
    Draw,
}

/// What a bet wins on.
///
/// Spread lines follow bookmaker convention: the selected side covers when
/// `side_score + line > opponent_score`, so a favourite carries a negative line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selection {
    Moneyline {
        outcome: GameOutcome,
    },
    Spread {
        side: Side,
        line: f64,
    },
    Total {
        direction: Direction,
        line: f64,
    },
    PlayerProp {
        player: EntityId,
        stat: String,
        direction: Direction,
        line: f64,
    },
}

impl Selection {
    #[must_use]
    pub const fn kind(&self) -> MarketKind {
        match self {
            Selection::Moneyline { .. } => MarketKind::Moneyline,
            Selection::Spread { .. } => MarketKind::Spread,
            Selection::Total { .. } => MarketKind::Total,
            Selection::PlayerProp { .. } => MarketKind::Prop,
        }
    }

    /// Line value, if the selection has one.
    #[must_use]
    pub const fn line(&self) -> Option<f64> {
        match self {
            Selection::Moneyline { .. } => None,
            Selection::Spread { line, .. }
            | Selection::Total { line, .. }
            | Selection::PlayerProp { line, .. } => Some(*line),
        }
    }

    /// Check the line is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLine`] for non-finite lines.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.line() {
            Some(line) if !line.is_finite() => Err(ValidationError::InvalidLine { line }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Moneyline { outcome } => match outcome {
                GameOutcome::HomeWin => write!(f, "home ML"),
                GameOutcome::AwayWin => write!(f, "away ML"),
                GameOutcome::Draw => write!(f, "draw"),
            },
            Selection::Spread { side, line } => write!(f, "{side} {line:+}"),
            Selection::Total { direction, line } => match direction {
                Direction::Over => write!(f, "over {line}"),
                Direction::Under => write!(f, "under {line}"),
            },
            Selection::PlayerProp {
                player,
                stat,
                direction,
                line,
            } => {
                let dir = match direction {
                    Direction::Over => "over",
                    Direction::Under => "under",
                };
                write!(f, "{player} {stat} {dir} {line}")
            }
        }
    }
}

/// One priced selection offered by a bookmaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub id: MarketId,
    pub selection: Selection,
    pub odds: Odds,
}

impl Market {
    pub fn new(id: impl Into<MarketId>, selection: Selection, odds: Odds) -> Self {
        Self {
            id: id.into(),
            selection,
            odds,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> MarketKind {
        self.selection.kind()
    }
}
