//! Domain identifier types with proper encapsulation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::league::League;

/// Team or player identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new EntityId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the entity ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Bookmaker market identifier - newtype for type safety.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketId(String);

impl MarketId {
    /// Create a new MarketId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the market ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MarketId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MarketId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Bet identifier of the form `YYYY-MM-DD_LEAGUE_N`.
///
/// `N` is a 1-based sequence number within the day and league.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BetId {
    date: NaiveDate,
    league: League,
    sequence: u32,
}

impl BetId {
    /// Create a bet ID for the given day, league and sequence number.
    #[must_use]
    pub const fn new(date: NaiveDate, league: League, sequence: u32) -> Self {
        Self {
            date,
            league,
            sequence,
        }
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub const fn league(&self) -> League {
        self.league
    }

    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The ID that follows this one on the same day and league.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self::new(self.date, self.league, self.sequence + 1)
    }
}

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.date.format("%Y-%m-%d"),
            self.league.as_str(),
            self.sequence
        )
    }
}

impl FromStr for BetId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| ValidationError::MalformedBetId {
            id: s.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = s.splitn(3, '_');
        let (Some(date), Some(league), Some(sequence)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed("expected three '_'-separated parts"));
        };

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| malformed("date must be YYYY-MM-DD"))?;
        let league = league
            .parse::<League>()
            .map_err(|_| malformed("unknown league"))?;
        let sequence = sequence
            .parse::<u32>()
            .map_err(|_| malformed("sequence must be a positive integer"))?;
        if sequence == 0 {
            return Err(malformed("sequence starts at 1"));
        }

        Ok(Self::new(date, league, sequence))
    }
}

impl Serialize for BetId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BetId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
