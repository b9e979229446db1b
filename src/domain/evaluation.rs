//! Pricing and sizing outputs: calibrated probabilities, edges, stakes, and
//! the serializable bet record handed to downstream consumers.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{BetId, MarketId};

/// Calibration method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalibrationMethod {
    /// Pull toward 0.5 by a shrink factor.
    Shrinkage,
    /// Clamp into the configured bounds.
    Cap,
    /// Remap through an empirical curve.
    Historical,
    /// Shrinkage (or historical when a curve is supplied) followed by cap.
    #[default]
    Combined,
}

impl CalibrationMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CalibrationMethod::Shrinkage => "shrinkage",
            CalibrationMethod::Cap => "cap",
            CalibrationMethod::Historical => "historical",
            CalibrationMethod::Combined => "combined",
        }
    }
}

impl fmt::Display for CalibrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalibrationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shrinkage" => Ok(CalibrationMethod::Shrinkage),
            "cap" => Ok(CalibrationMethod::Cap),
            "historical" => Ok(CalibrationMethod::Historical),
            "combined" => Ok(CalibrationMethod::Combined),
            other => Err(format!("unknown calibration method '{other}'")),
        }
    }
}

/// A raw simulated probability and its calibrated counterpart.
///
/// `calibrated` is always strictly inside (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibratedProbability {
    pub raw: f64,
    pub calibrated: f64,
    /// Method that actually produced `calibrated`.
    pub method: CalibrationMethod,
}

/// Model probability compared against the market price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeResult {
    pub implied_probability: f64,
    pub calibrated_probability: f64,
    /// `(calibrated - implied) * 100`. Reporting only; stakes are sized
    /// from `expected_value`.
    pub edge_pct: f64,
    /// Expected profit per unit staked, `calibrated * decimal_odds - 1`.
    /// This is the edge Kelly sizing consumes.
    pub expected_value: f64,
}

impl EdgeResult {
    /// Edge as a probability difference rather than a percentage.
    #[must_use]
    pub fn edge(&self) -> f64 {
        self.edge_pct / 100.0
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.edge_pct > 0.0
    }
}

/// Kelly sizing for one bet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakeRecommendation {
    /// Full Kelly fraction of bankroll, `expected_value / (decimal_odds - 1)`.
    pub kelly_fraction: f64,
    /// After the fractional-Kelly multiplier and the hard cap.
    pub capped_fraction: f64,
    pub bankroll: Decimal,
    /// Recommended amount to stake, in bankroll units.
    pub stake: Decimal,
}

impl StakeRecommendation {
    /// A recommendation to not bet.
    #[must_use]
    pub const fn no_bet(bankroll: Decimal) -> Self {
        Self {
            kelly_fraction: 0.0,
            capped_fraction: 0.0,
            bankroll,
            stake: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn is_bet(&self) -> bool {
        self.stake > Decimal::ZERO
    }
}

/// Settlement state of a logged bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetOutcome {
    #[default]
    Pending,
    Won,
    Lost,
    Push,
    Void,
}

/// The stable output record of one evaluated market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRecord {
    pub bet_id: BetId,
    pub market_id: MarketId,
    pub selection: String,
    pub odds: String,
    /// Probability edge in percentage points, `(calibrated - implied) * 100`.
    pub edge_pct: f64,
    pub calibrated_prob: f64,
    pub implied_prob: f64,
    /// Expected profit per unit staked, `calibrated * decimal_odds - 1`.
    pub ev: f64,
    /// Full Kelly fraction sized from `ev`, not from `edge_pct`.
    pub kelly_fraction: f64,
    pub stake_recommendation: Decimal,
    pub n_iterations: usize,
    pub simulation_seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::League;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn calibration_method_parses() {
        assert_eq!(
            "Combined".parse::<CalibrationMethod>().unwrap(),
            CalibrationMethod::Combined
        );
        assert!("isotonic".parse::<CalibrationMethod>().is_err());
    }

    #[test]
    fn no_bet_has_zero_stake() {
        let rec = StakeRecommendation::no_bet(dec!(1000));
        assert!(!rec.is_bet());
        assert_eq!(rec.kelly_fraction, 0.0);
    }

    #[test]
    fn bet_record_serializes_contract_fields() {
        let record = BetRecord {
            bet_id: BetId::new(
                NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                League::Nba,
                1,
            ),
            market_id: MarketId::new("m-1"),
            selection: "home ML".to_string(),
            odds: "-110".to_string(),
            edge_pct: 1.62,
            calibrated_prob: 0.54,
            implied_prob: 0.5238,
            ev: 0.031,
            kelly_fraction: 0.0178,
            stake_recommendation: dec!(4.45),
            n_iterations: 10_000,
            simulation_seed: 42,
        };
        let value = serde_json::to_value(&record).unwrap();
        for field in [
            "edge_pct",
            "calibrated_prob",
            "implied_prob",
            "ev",
            "kelly_fraction",
            "stake_recommendation",
            "n_iterations",
            "simulation_seed",
        ] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        assert_eq!(value["bet_id"], "2026-10-19_NBA_1");
    }
}
