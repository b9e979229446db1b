//! Correlation-adjusted parlay pricing.
//!
//! The naive parlay probability multiplies leg probabilities as if legs were
//! independent. With average pairwise correlation ρ̄ the estimate is moved
//! toward the comonotone bound `min(p)` when ρ̄ > 0, or toward the lower
//! Fréchet bound `max(0, Σp - (n - 1))` when ρ̄ < 0, in proportion to |ρ̄|.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::edge::EdgeEvaluator;
use crate::domain::error::ValidationError;
use crate::domain::{EdgeResult, Odds};
use crate::error::Result;

pub const DEFAULT_CORRELATION: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParlayParams {
    /// Used when no simulated correlation is available.
    pub default_correlation: f64,
}

impl Default for ParlayParams {
    fn default() -> Self {
        Self {
            default_correlation: DEFAULT_CORRELATION,
        }
    }
}

/// One priced parlay leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParlayLeg {
    pub probability: f64,
    pub odds: Odds,
}

/// Priced parlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParlayEvaluation {
    pub naive_probability: f64,
    pub adjusted_probability: f64,
    pub average_correlation: f64,
    pub odds: Odds,
    pub edge: EdgeResult,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParlayEvaluator {
    params: ParlayParams,
    edges: EdgeEvaluator,
}

impl ParlayEvaluator {
    pub fn new(params: ParlayParams) -> Self {
        Self {
            params,
            edges: EdgeEvaluator::new(),
        }
    }

    pub const fn params(&self) -> &ParlayParams {
        &self.params
    }

    /// Joint probability adjusted by average pairwise correlation.
    ///
    /// `correlation` falls back to the configured default when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyLegs`] without legs,
    /// [`ValidationError::InvalidProbability`] for a leg outside [0, 1] and
    /// [`ValidationError::InvalidCorrelation`] for ρ̄ outside [-1, 1].
    pub fn adjusted_probability(
        &self,
        probabilities: &[f64],
        correlation: Option<f64>,
    ) -> std::result::Result<f64, ValidationError> {
        if probabilities.is_empty() {
            return Err(ValidationError::EmptyLegs);
        }
        for (i, &p) in probabilities.iter().enumerate() {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(ValidationError::InvalidProbability {
                    label: format!("leg {}", i + 1),
                    value: p,
                });
            }
        }
        let rho = correlation.unwrap_or(self.params.default_correlation);
        if !rho.is_finite() || !(-1.0..=1.0).contains(&rho) {
            return Err(ValidationError::InvalidCorrelation { value: rho });
        }

        let naive = naive_probability(probabilities);
        let upper = probabilities.iter().copied().fold(1.0, f64::min);
        let lower = (probabilities.iter().sum::<f64>() - (probabilities.len() as f64 - 1.0)).max(0.0);

        let adjusted = if rho >= 0.0 {
            naive + rho * (upper - naive)
        } else {
            naive + rho * (naive - lower)
        };
        Ok(adjusted.clamp(0.0, upper))
    }

    /// Price a parlay against its combined odds.
    ///
    /// Combined odds are the product of leg decimal prices unless `quoted`
    /// supplies the book's parlay price.
    ///
    /// # Errors
    ///
    /// Fails on the validation errors of
    /// [`ParlayEvaluator::adjusted_probability`] and on a combined price that
    /// is not valid odds. Legs that cannot all win price at probability 0.
    pub fn evaluate(
        &self,
        legs: &[ParlayLeg],
        correlation: Option<f64>,
        quoted: Option<Odds>,
    ) -> Result<ParlayEvaluation> {
        let probabilities: Vec<f64> = legs.iter().map(|l| l.probability).collect();
        let adjusted = self.adjusted_probability(&probabilities, correlation)?;
        let odds = match quoted {
            Some(odds) => odds,
            None => Odds::decimal(legs.iter().map(|l| l.odds.to_decimal()).product())?,
        };
        let edge = self.edges.price(adjusted, &odds);
        let average_correlation = correlation.unwrap_or(self.params.default_correlation);

        debug!(
            legs = legs.len(),
            naive = naive_probability(&probabilities),
            adjusted,
            correlation = average_correlation,
            "Parlay priced"
        );
        Ok(ParlayEvaluation {
            naive_probability: naive_probability(&probabilities),
            adjusted_probability: adjusted,
            average_correlation,
            odds,
            edge,
        })
    }
}

/// Product of leg probabilities.
#[must_use]
pub fn naive_probability(probabilities: &[f64]) -> f64 {
    probabilities.iter().product()
}

/// Mean of the off-diagonal entries of a correlation matrix.
///
/// Zero for fewer than two legs.
#[must_use]
pub fn average_correlation(matrix: &[Vec<f64>]) -> f64 {
    let n = matrix.len();
    if n < 2 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            sum += matrix[i].get(j).copied().unwrap_or(0.0);
        }
    }
    sum / (n * (n - 1) / 2) as f64
}
