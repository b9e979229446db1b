use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::error::ValidationError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("requested {requested} iterations, below the configured minimum of {minimum}")]
    InsufficientIterations { requested: usize, minimum: usize },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Bookmaker odds that cannot be priced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OddsError {
    #[error("odds of zero are not a price")]
    Zero,

    #[error("malformed odds '{0}'")]
    Malformed(String),

    #[error("american odds must be <= -100 or >= +100, got {0}")]
    AmericanOutOfRange(f64),

    #[error("decimal odds must be greater than 1.0, got {0}")]
    DecimalOutOfRange(f64),

    #[error("odds must be finite")]
    NonFinite,

    #[error("probability {0} has no finite odds; must be strictly between 0 and 1")]
    ProbabilityOutOfRange(f64),
}

/// Simulation runs that could not produce a valid result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("simulation cancelled after {completed} of {required} iterations")]
    Cancelled { completed: usize, required: usize },

    #[error("could not draw a valid '{stat}' value after {attempts} attempts")]
    ResampleExhausted { stat: String, attempts: usize },

    #[error("cannot build a sampling distribution for '{stat}': {reason}")]
    InvalidDistribution { stat: String, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidOdds(#[from] OddsError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("bankroll must be positive, got {bankroll}")]
    InvalidBankroll { bankroll: Decimal },

    #[error("bet '{bet_id}' is not in the ledger")]
    UnknownBet { bet_id: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
