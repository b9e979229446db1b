//! Market-implied probability, edge and expected value.

use tracing::debug;

use crate::domain::error::ValidationError;
use crate::domain::{EdgeResult, Odds, OddsFormat};
use crate::error::{OddsError, Result};

/// Implied probability of a price string such as `"-110"`, `"+150"` or `"1.91"`.
///
/// # Errors
///
/// Returns [`OddsError`] for zero, malformed or out-of-range prices.
pub fn implied_probability(odds: &str) -> std::result::Result<f64, OddsError> {
    Ok(Odds::parse(odds)?.implied_probability())
}

/// `(model_p - implied_p) * 100`.
#[must_use]
pub fn edge_percentage(model_p: f64, implied_p: f64) -> f64 {
    (model_p - implied_p) * 100.0
}

/// Expected profit of staking `stake` at `odds` when the win probability is
/// `model_p`.
///
/// Uses the net payout of the price, so `+150` pays 1.5 per unit and `-150`
/// pays 0.667 per unit.
#[must_use]
pub fn expected_value(model_p: f64, odds: &Odds, stake: f64) -> f64 {
    stake * (model_p * odds.net_payout() - (1.0 - model_p))
}

/// Fair price for a probability.
///
/// # Errors
///
/// Returns [`OddsError::ProbabilityOutOfRange`] unless `0 < p < 1`.
pub fn odds_from_probability(p: f64, format: OddsFormat) -> std::result::Result<Odds, OddsError> {
    Odds::from_probability(p, format)
}

/// Compares calibrated probabilities against market prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeEvaluator;

impl EdgeEvaluator {
    pub const fn new() -> Self {
        Self
    }

    /// Edge and per-unit expected value of a bet.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProbability`] unless the probability
    /// is strictly inside (0, 1).
    pub fn evaluate(&self, calibrated_p: f64, odds: &Odds) -> Result<EdgeResult> {
        if !(calibrated_p > 0.0 && calibrated_p < 1.0) {
            return Err(ValidationError::InvalidProbability {
                label: "calibrated".to_string(),
                value: calibrated_p,
            }
            .into());
        }
        Ok(self.price(calibrated_p, odds))
    }

    /// Edge of a probability already known to lie in [0, 1].
    ///
    /// Accepts the closed interval, so a bet that can never win prices at
    /// an expected value of -1 per unit.
    #[must_use]
    pub fn price(&self, probability: f64, odds: &Odds) -> EdgeResult {
        let implied = odds.implied_probability();
        let result = EdgeResult {
            implied_probability: implied,
            calibrated_probability: probability,
            edge_pct: edge_percentage(probability, implied),
            expected_value: expected_value(probability, odds, 1.0),
        };
        debug!(
            odds = %odds,
            implied,
            calibrated = probability,
            edge_pct = result.edge_pct,
            "Edge evaluated"
        );
        result
    }
}
