//! League tags and the game-mechanics family each league plays under.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Supported leagues.
///
/// Parsing is case-insensitive and accepts a few common aliases
/// (`"EPL"`, `"MLS"` map to [`League::Soccer`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    Nba,
    Wnba,
    Ncaab,
    Nfl,
    Ncaaf,
    Mlb,
    Nhl,
    Soccer,
}

/// How a league turns stat draws into a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mechanics {
    /// Shared possession count times per-possession scoring (basketball).
    Possession,
    /// Per-side drive chains ending in touchdown, field goal, or nothing (football).
    Drive,
    /// Half-inning state progression with extra innings (baseball).
    Inning,
    /// Per-side goal counts (hockey, soccer).
    Goal,
}

impl League {
    /// All supported leagues.
    pub const ALL: [League; 8] = [
        League::Nba,
        League::Wnba,
        League::Ncaab,
        League::Nfl,
        League::Ncaaf,
        League::Mlb,
        League::Nhl,
        League::Soccer,
    ];

    /// Upper-case tag used in bet identifiers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            League::Nba => "NBA",
            League::Wnba => "WNBA",
            League::Ncaab => "NCAAB",
            League::Nfl => "NFL",
            League::Ncaaf => "NCAAF",
            League::Mlb => "MLB",
            League::Nhl => "NHL",
            League::Soccer => "SOCCER",
        }
    }

    /// Lower-case key used for per-league configuration tables.
    #[must_use]
    pub const fn config_key(&self) -> &'static str {
        match self {
            League::Nba => "nba",
            League::Wnba => "wnba",
            League::Ncaab => "ncaab",
            League::Nfl => "nfl",
            League::Ncaaf => "ncaaf",
            League::Mlb => "mlb",
            League::Nhl => "nhl",
            League::Soccer => "soccer",
        }
    }

    #[must_use]
    pub const fn mechanics(&self) -> Mechanics {
        match self {
            League::Nba | League::Wnba | League::Ncaab => Mechanics::Possession,
            League::Nfl | League::Ncaaf => Mechanics::Drive,
            League::Mlb => Mechanics::Inning,
            League::Nhl | League::Soccer => Mechanics::Goal,
        }
    }

    /// Whether a game can end level after regulation and stay that way.
    #[must_use]
    pub const fn allows_draw(&self) -> bool {
        matches!(self, League::Soccer)
    }

    /// Whether weather signals affect scoring.
    #[must_use]
    pub const fn is_outdoor(&self) -> bool {
        matches!(
            self,
            League::Nfl | League::Ncaaf | League::Mlb | League::Soccer
        )
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for League {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NBA" => Ok(League::Nba),
            "WNBA" => Ok(League::Wnba),
            "NCAAB" | "CBB" => Ok(League::Ncaab),
            "NFL" => Ok(League::Nfl),
            "NCAAF" | "CFB" => Ok(League::Ncaaf),
            "MLB" => Ok(League::Mlb),
            "NHL" => Ok(League::Nhl),
            "SOCCER" | "EPL" | "MLS" => Ok(League::Soccer),
            _ => Err(ValidationError::UnknownLeague { tag: s.to_string() }),
        }
    }
}
