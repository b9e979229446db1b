//! Bookmaker prices in American or decimal format.
//!
//! An [`Odds`] value is validated on construction, so conversion to decimal
//! odds and implied probability cannot fail afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::OddsError;

/// Price format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    American,
    Decimal,
}

/// A validated bookmaker price.
///
/// Serialized as its display string (`"-110"`, `"+150"`, `"1.91"`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Odds {
    /// Moneyline price: `-110` risks 110 to win 100, `+150` risks 100 to win 150.
    American(f64),
    /// Total return per unit staked, stake included.
    Decimal(f64),
}

impl Odds {
    /// Validated American odds.
    ///
    /// # Errors
    ///
    /// Rejects zero, non-finite values, and values strictly between -100 and +100.
    pub fn american(value: f64) -> Result<Self, OddsError> {
        if !value.is_finite() {
            return Err(OddsError::NonFinite);
        }
        if value == 0.0 {
            return Err(OddsError::Zero);
        }
        if value.abs() < 100.0 {
            return Err(OddsError::AmericanOutOfRange(value));
        }
        Ok(Self::American(value))
    }

    /// Validated decimal odds.
    ///
    /// # Errors
    ///
    /// Rejects zero, non-finite values, and values not greater than 1.0.
    pub fn decimal(value: f64) -> Result<Self, OddsError> {
        if !value.is_finite() {
            return Err(OddsError::NonFinite);
        }
        if value == 0.0 {
            return Err(OddsError::Zero);
        }
        if value <= 1.0 {
            return Err(OddsError::DecimalOutOfRange(value));
        }
        Ok(Self::Decimal(value))
    }

    /// Parse a price string.
    ///
    /// A leading `+` or `-` marks American odds; unsigned numbers are decimal
    /// odds.
    ///
    /// # Errors
    ///
    /// Returns [`OddsError::Malformed`] for anything that is not a number and
    /// the range errors of [`Odds::american`] / [`Odds::decimal`] otherwise.
    pub fn parse(input: &str) -> Result<Self, OddsError> {
        let trimmed = input.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| OddsError::Malformed(input.to_string()))?;
        if trimmed.starts_with('+') || trimmed.starts_with('-') {
            Self::american(value)
        } else {
            Self::decimal(value)
        }
    }

    /// Fair odds for a probability in the requested format.
    ///
    /// # Errors
    ///
    /// Returns [`OddsError::ProbabilityOutOfRange`] unless `0 < p < 1`.
    pub fn from_probability(probability: f64, format: OddsFormat) -> Result<Self, OddsError> {
        if !(probability > 0.0 && probability < 1.0) {
            return Err(OddsError::ProbabilityOutOfRange(probability));
        }
        match format {
            OddsFormat::Decimal => Self::decimal(1.0 / probability),
            OddsFormat::American => {
                let value = if probability >= 0.5 {
                    -100.0 * probability / (1.0 - probability)
                } else {
                    100.0 * (1.0 - probability) / probability
                };
                Self::american(value)
            }
        }
    }

    #[must_use]
    pub const fn format(&self) -> OddsFormat {
        match self {
            Odds::American(_) => OddsFormat::American,
            Odds::Decimal(_) => OddsFormat::Decimal,
        }
    }

    /// Total return per unit staked, stake included.
    #[must_use]
    pub fn to_decimal(&self) -> f64 {
        match *self {
            Odds::Decimal(d) => d,
            Odds::American(a) if a > 0.0 => 1.0 + a / 100.0,
            Odds::American(a) => 1.0 + 100.0 / a.abs(),
        }
    }

    /// Profit per unit staked on a win.
    #[must_use]
    pub fn net_payout(&self) -> f64 {
        self.to_decimal() - 1.0
    }

    /// Probability implied by the price, vig included.
    #[must_use]
    pub fn implied_probability(&self) -> f64 {
        1.0 / self.to_decimal()
    }
}

/// Strip the bookmaker margin from a two-way market.
///
/// Returns both sides' probabilities normalized to sum to 1.
#[must_use]
pub fn remove_vig(side_a: &Odds, side_b: &Odds) -> (f64, f64) {
    let a = side_a.implied_probability();
    let b = side_b.implied_probability();
    let total = a + b;
    (a / total, b / total)
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Odds::American(a) if a > 0.0 => write!(f, "+{a}"),
            Odds::American(a) => write!(f, "{a}"),
            Odds::Decimal(d) => write!(f, "{d}"),
        }
    }
}

impl TryFrom<String> for Odds {
    type Error = OddsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Odds> for String {
    fn from(odds: Odds) -> Self {
        odds.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minus_110_implies_52_38_percent() {
        let odds = Odds::parse("-110").unwrap();
        assert!((odds.implied_probability() - 0.5238).abs() < 1e-4);
    }

    #[test]
    fn plus_150_pays_one_and_a_half() {
        let odds = Odds::parse("+150").unwrap();
        assert!((odds.to_decimal() - 2.5).abs() < 1e-12);
        assert!((odds.net_payout() - 1.5).abs() < 1e-12);
        assert!((odds.implied_probability() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn unsigned_numbers_are_decimal() {
        let odds = Odds::parse("1.91").unwrap();
        assert_eq!(odds, Odds::Decimal(1.91));
    }

    #[test]
    fn zero_odds_are_rejected() {
        assert_eq!(Odds::parse("0"), Err(OddsError::Zero));
        assert_eq!(Odds::parse("+0"), Err(OddsError::Zero));
        assert_eq!(Odds::american(0.0), Err(OddsError::Zero));
    }

    #[test]
    fn malformed_strings_are_rejected() {
        for bad in ["", "abc", "-11o", "1,91"] {
            assert!(matches!(Odds::parse(bad), Err(OddsError::Malformed(_))), "{bad}");
        }
    }

    #[test]
    fn out_of_range_prices_are_rejected() {
        assert_eq!(Odds::parse("-50"), Err(OddsError::AmericanOutOfRange(-50.0)));
        assert_eq!(Odds::parse("0.95"), Err(OddsError::DecimalOutOfRange(0.95)));
        assert_eq!(Odds::decimal(f64::NAN), Err(OddsError::NonFinite));
    }

    #[test]
    fn fair_odds_from_probability() {
        let fav = Odds::from_probability(0.6, OddsFormat::American).unwrap();
        assert!(matches!(fav, Odds::American(a) if (a + 150.0).abs() < 1e-9));
        let dog = Odds::from_probability(0.4, OddsFormat::American).unwrap();
        assert!(matches!(dog, Odds::American(a) if (a - 150.0).abs() < 1e-9));
        assert!(Odds::from_probability(1.0, OddsFormat::Decimal).is_err());
    }

    #[test]
    fn remove_vig_normalizes_two_way_market() {
        let a = Odds::parse("-110").unwrap();
        let b = Odds::parse("-110").unwrap();
        let (pa, pb) = remove_vig(&a, &b);
        assert!((pa - 0.5).abs() < 1e-12);
        assert!((pa + pb - 1.0).abs() < 1e-12);
    }

    #[test]
    fn serializes_as_display_string() {
        let odds = Odds::parse("+150").unwrap();
        assert_eq!(serde_json::to_string(&odds).unwrap(), "\"+150\"");
        let back: Odds = serde_json::from_str("\"-110\"").unwrap();
        assert_eq!(back, Odds::American(-110.0));
        assert!(serde_json::from_str::<Odds>("\"0\"").is_err());
    }
}
