//! Fractional Kelly stake sizing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Odds, StakeRecommendation};
use crate::error::{Error, Result};

pub const DEFAULT_KELLY_MULTIPLIER: f64 = 0.25;
pub const DEFAULT_MAX_STAKE_FRACTION: f64 = 0.05;

/// Full Kelly fraction `edge / (decimal_odds - 1)`.
///
/// `edge` is the expected profit per unit staked (`p * decimal - 1`), as in
/// [`EdgeResult::expected_value`](crate::domain::EdgeResult::expected_value).
/// It is not the probability difference behind `edge_pct`. Returns 0 for
/// non-positive or non-finite edges.
#[must_use]
pub fn kelly_fraction(edge: f64, odds: &Odds) -> f64 {
    if !edge.is_finite() || edge <= 0.0 {
        return 0.0;
    }
    edge / odds.net_payout()
}

/// Risk policy applied on top of full Kelly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakingPolicy {
    /// Fraction of full Kelly to bet (0.25 is quarter Kelly).
    pub kelly_multiplier: f64,
    /// Hard cap on the stake as a fraction of bankroll.
    pub max_stake_fraction: f64,
    /// Bets whose per-unit edge does not exceed this are skipped.
    pub min_edge: f64,
}

impl Default for StakingPolicy {
    fn default() -> Self {
        Self {
            kelly_multiplier: DEFAULT_KELLY_MULTIPLIER,
            max_stake_fraction: DEFAULT_MAX_STAKE_FRACTION,
            min_edge: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KellyStaker {
    policy: StakingPolicy,
}

impl KellyStaker {
    pub const fn new(policy: StakingPolicy) -> Self {
        Self { policy }
    }

    pub const fn policy(&self) -> &StakingPolicy {
        &self.policy
    }

    /// Recommended stake for a bet with per-unit `edge` at `odds`.
    ///
    /// The stake is rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBankroll`] if `bankroll` is not positive.
    pub fn recommend(&self, edge: f64, odds: &Odds, bankroll: Decimal) -> Result<StakeRecommendation> {
        if bankroll <= Decimal::ZERO {
            return Err(Error::InvalidBankroll { bankroll });
        }
        if edge <= self.policy.min_edge {
            return Ok(StakeRecommendation::no_bet(bankroll));
        }

        let kelly = kelly_fraction(edge, odds);
        let capped = (kelly * self.policy.kelly_multiplier)
            .min(self.policy.max_stake_fraction)
            .max(0.0);
        let stake = Decimal::from_f64_retain(capped)
            .map(|fraction| (bankroll * fraction).round_dp(2))
            .unwrap_or(Decimal::ZERO);

        debug!(edge, kelly, capped, %stake, "Stake sized");
        Ok(StakeRecommendation {
            kelly_fraction: kelly,
            capped_fraction: capped,
            bankroll,
            stake,
        })
    }
}
