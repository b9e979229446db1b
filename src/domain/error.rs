//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by `try_new` constructors and by the pipeline
//! stages that validate their inputs before doing any numeric work.
//!
//! # Examples
//!
//! ```
//! use sharpline::domain::error::ValidationError;
//! use sharpline::domain::League;
//!
//! let result: Result<League, _> = "cricket".parse();
//! assert!(matches!(result, Err(ValidationError::UnknownLeague { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The league tag is not one of the supported leagues.
    #[error("unknown league tag '{tag}'")]
    UnknownLeague {
        /// The tag that was provided.
        tag: String,
    },

    /// A projected stat has zero, negative, or non-finite variance.
    ///
    /// A zero-variance stat collapses the simulation to a point mass.
    #[error("stat '{stat}' must have strictly positive variance, got {variance}")]
    NonPositiveVariance {
        /// Name of the offending stat.
        stat: String,
        /// The invalid variance.
        variance: f64,
    },

    /// A projected stat has a negative or non-finite mean.
    #[error("stat '{stat}' must have a finite non-negative mean, got {mean}")]
    InvalidMean {
        /// Name of the offending stat.
        stat: String,
        /// The invalid mean.
        mean: f64,
    },

    /// Context signals are not a key/value payload.
    #[error("malformed context signals: {reason}")]
    MalformedSignals {
        /// What was wrong with the payload.
        reason: String,
    },

    /// A stat required by the league's game mechanics is missing.
    #[error("entity '{entity}' is missing required stat '{stat}'")]
    MissingStat {
        /// Entity the stat was looked up on.
        entity: String,
        /// Name of the missing stat.
        stat: String,
    },

    /// Home and away entities belong to different leagues.
    #[error("league mismatch: expected {expected}, got {actual}")]
    LeagueMismatch {
        /// League of the matchup.
        expected: String,
        /// League of the offending entity.
        actual: String,
    },

    /// A probability lies outside [0, 1] or is not finite.
    #[error("probability for '{label}' must be within [0, 1], got {value}")]
    InvalidProbability {
        /// What the probability describes.
        label: String,
        /// The invalid value.
        value: f64,
    },

    /// A correlation coefficient lies outside [-1, 1].
    #[error("correlation must be within [-1, 1], got {value}")]
    InvalidCorrelation {
        /// The invalid value.
        value: f64,
    },

    /// A player allocation share is outside (0, 1] or shares over-allocate a basis.
    #[error("invalid allocation for '{player}': {reason}")]
    InvalidAllocation {
        /// Player the allocation belongs to.
        player: String,
        /// Why the allocation was rejected.
        reason: String,
    },

    /// A query referenced a player that has no allocation.
    #[error("no allocation for player '{player}' stat '{stat}'")]
    UnknownPlayer {
        /// Player identifier.
        player: String,
        /// Stat that was requested.
        stat: String,
    },

    /// A parlay leg referenced a market that is not part of the request.
    #[error("unknown market '{market}'")]
    UnknownMarket {
        /// Market identifier.
        market: String,
    },

    /// Parlays and joint queries need at least one leg.
    #[error("legs cannot be empty")]
    EmptyLegs,

    /// A betting line is not finite.
    #[error("line must be finite, got {line}")]
    InvalidLine {
        /// The invalid line value.
        line: f64,
    },

    /// A bet identifier does not follow `YYYY-MM-DD_LEAGUE_N`.
    #[error("malformed bet id '{id}': {reason}")]
    MalformedBetId {
        /// The identifier that failed to parse.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Historical calibration data cannot form a curve.
    #[error("invalid calibration curve: {reason}")]
    InvalidCalibrationCurve {
        /// Why the curve was rejected.
        reason: String,
    },

    /// A draw-market selection was requested for a league without draws.
    #[error("league {league} does not allow drawn games")]
    DrawNotPossible {
        /// League tag.
        league: String,
    },
}
