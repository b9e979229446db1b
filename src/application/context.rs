//! Context normalization.
//!
//! Turns loosely-typed situational signals into a bounded [`MatchupContext`].
//!
//! The normalizer is deliberately permissive: a missing signal, a signal of
//! the wrong type, or a value outside its range never fails the matchup. The
//! affected factor falls back to neutral (1.0) or is clamped, and a warning is
//! logged. Two runs with different amounts of missing data therefore produce
//! different contexts from the same game; callers that need strict inputs
//! should validate signals before calling. Only structurally unusable input
//! (an unknown league, a payload that is not a JSON object) is an error.
//!
//! Recognized signals:
//!
//! | key                                       | meaning                          |
//! |-------------------------------------------|----------------------------------|
//! | `pace`                                    | game pace vs league average      |
//! | `home_efficiency`, `away_efficiency`      | scoring efficiency vs average    |
//! | `wind_mph`, `temperature_f`, `precipitation` | outdoor weather (0-1 precip)  |
//! | `home_rest_days`, `away_rest_days`        | days since previous game         |
//! | `home_travel_miles`, `away_travel_miles`  | distance travelled to the venue  |

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::error::ValidationError;
use crate::domain::{ContextFactor, League, MatchupContext, Side};

/// Wind above this speed starts to suppress scoring.
const WIND_THRESHOLD_MPH: f64 = 10.0;
const WIND_PENALTY_PER_MPH: f64 = 0.005;
/// Temperatures below this start to suppress scoring.
const COLD_THRESHOLD_F: f64 = 45.0;
const COLD_PENALTY_PER_DEGREE: f64 = 0.003;
const PRECIPITATION_PENALTY: f64 = 0.05;
/// Rest advantage is capped at this many days.
const MAX_REST_DIFF_DAYS: f64 = 3.0;
const REST_EFFECT_PER_DAY: f64 = 0.01;
const TRAVEL_PENALTY_PER_1000_MILES: f64 = 0.01;

const KNOWN_KEYS: [&str; 10] = [
    "pace",
    "home_efficiency",
    "away_efficiency",
    "wind_mph",
    "temperature_f",
    "precipitation",
    "home_rest_days",
    "away_rest_days",
    "home_travel_miles",
    "away_travel_miles",
];

/// Maps raw signals to a bounded [`MatchupContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextNormalizer;

impl ContextNormalizer {
    pub const fn new() -> Self {
        Self
    }

    /// Normalize signals for a league given by tag.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownLeague`] for an unrecognized tag, and
    /// the errors of [`ContextNormalizer::normalize`].
    pub fn normalize_tagged(
        &self,
        league_tag: &str,
        signals: &Value,
    ) -> Result<MatchupContext, ValidationError> {
        let league: League = league_tag.parse()?;
        self.normalize(league, signals)
    }

    /// Normalize signals for a known league.
    ///
    /// `Value::Null` is treated as "no signals".
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedSignals`] when `signals` is neither
    /// an object nor null.
    pub fn normalize(
        &self,
        league: League,
        signals: &Value,
    ) -> Result<MatchupContext, ValidationError> {
        let empty = Map::new();
        let map = match signals {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(ValidationError::MalformedSignals {
                    reason: format!("expected a JSON object, got {}", type_name(other)),
                })
            }
        };

        for key in map.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            debug!(key = %key, "Ignoring unrecognized context signal");
        }

        let mut ctx = MatchupContext::neutral(league);

        if let Some(pace) = number(map, "pace") {
            ctx = ctx.with_factor(ContextFactor::Pace, Side::Home, pace);
        }

        for side in [Side::Home, Side::Away] {
            let key = format!("{}_efficiency", side.as_str());
            if let Some(eff) = number(map, &key) {
                ctx = ctx.with_factor(ContextFactor::Efficiency, side, eff);
            }
        }

        if league.is_outdoor() {
            ctx = ctx.with_factor(ContextFactor::Weather, Side::Home, weather_factor(map));
        }

        match (number(map, "home_rest_days"), number(map, "away_rest_days")) {
            (Some(home), Some(away)) => {
                let diff = (home - away).clamp(-MAX_REST_DIFF_DAYS, MAX_REST_DIFF_DAYS);
                ctx = ctx
                    .with_factor(ContextFactor::Rest, Side::Home, 1.0 + REST_EFFECT_PER_DAY * diff)
                    .with_factor(ContextFactor::Rest, Side::Away, 1.0 - REST_EFFECT_PER_DAY * diff);
            }
            (None, None) => {}
            _ => warn!("Rest days present for only one side, using neutral rest"),
        }

        for side in [Side::Home, Side::Away] {
            let key = format!("{}_travel_miles", side.as_str());
            if let Some(miles) = number(map, &key) {
                let factor = 1.0 - TRAVEL_PENALTY_PER_1000_MILES * miles.max(0.0) / 1000.0;
                ctx = ctx.with_factor(ContextFactor::Travel, side, factor);
            }
        }

        debug!(league = %league, "Context normalized");
        Ok(ctx)
    }
}

/// Weather severity multiplier; 1.0 means no effect.
fn weather_factor(map: &Map<String, Value>) -> f64 {
    let wind = number(map, "wind_mph").unwrap_or(0.0);
    let temp = number(map, "temperature_f").unwrap_or(COLD_THRESHOLD_F);
    let precip = number(map, "precipitation").unwrap_or(0.0).clamp(0.0, 1.0);

    1.0 - WIND_PENALTY_PER_MPH * (wind - WIND_THRESHOLD_MPH).max(0.0)
        - COLD_PENALTY_PER_DEGREE * (COLD_THRESHOLD_F - temp).max(0.0)
        - PRECIPITATION_PENALTY * precip
}

/// Read a numeric signal, accepting numbers, numeric strings, and booleans.
///
/// Anything else is logged and treated as missing.
fn number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = map.get(key)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => return None,
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Some(v),
        _ => {
            warn!(key = %key, value = %value, "Unusable context signal, using neutral value");
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_signals_default_to_neutral() {
        let ctx = ContextNormalizer::new()
            .normalize(League::Nba, &json!({}))
            .unwrap();
        assert_eq!(ctx, MatchupContext::neutral(League::Nba));
    }

    #[test]
    fn null_signals_are_empty() {
        let ctx = ContextNormalizer::new()
            .normalize(League::Nfl, &Value::Null)
            .unwrap();
        assert_eq!(ctx, MatchupContext::neutral(League::Nfl));
    }

    #[test]
    fn unknown_league_fails() {
        let err = ContextNormalizer::new()
            .normalize_tagged("XFL", &json!({}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownLeague { .. }));
    }

    #[test]
    fn non_object_payload_fails() {
        let err = ContextNormalizer::new()
            .normalize(League::Nba, &json!([1, 2, 3]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::MalformedSignals { .. }));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let ctx = ContextNormalizer::new()
            .normalize(League::Nba, &json!({"pace": 5.0, "home_efficiency": 0.1}))
            .unwrap();
        assert_eq!(ctx.factor(ContextFactor::Pace, Side::Home), 1.2);
        assert_eq!(ctx.factor(ContextFactor::Efficiency, Side::Home), 0.8);
    }

    #[test]
    fn mistyped_values_degrade_to_neutral() {
        let ctx = ContextNormalizer::new()
            .normalize(League::Nba, &json!({"pace": {"value": 1.1}, "home_efficiency": "1.05"}))
            .unwrap();
        assert_eq!(ctx.factor(ContextFactor::Pace, Side::Home), 1.0);
        assert!((ctx.factor(ContextFactor::Efficiency, Side::Home) - 1.05).abs() < 1e-12);
    }

    #[test]
    fn weather_only_affects_outdoor_leagues() {
        let signals = json!({"wind_mph": 25.0, "temperature_f": 20.0, "precipitation": 1.0});
        let indoor = ContextNormalizer::new()
            .normalize(League::Nba, &signals)
            .unwrap();
        let outdoor = ContextNormalizer::new()
            .normalize(League::Nfl, &signals)
            .unwrap();
        assert_eq!(indoor.factor(ContextFactor::Weather, Side::Home), 1.0);
        // 1 - 0.075 - 0.075 - 0.05 = 0.8
        assert!((outdoor.factor(ContextFactor::Weather, Side::Home) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn rest_differential_is_symmetric() {
        let ctx = ContextNormalizer::new()
            .normalize(League::Nba, &json!({"home_rest_days": 3, "away_rest_days": 1}))
            .unwrap();
        assert!((ctx.factor(ContextFactor::Rest, Side::Home) - 1.02).abs() < 1e-12);
        assert!((ctx.factor(ContextFactor::Rest, Side::Away) - 0.98).abs() < 1e-12);
    }

    #[test]
    fn travel_penalizes_distance() {
        let ctx = ContextNormalizer::new()
            .normalize(League::Nhl, &json!({"away_travel_miles": 2500}))
            .unwrap();
        assert!((ctx.factor(ContextFactor::Travel, Side::Away) - 0.975).abs() < 1e-12);
        assert_eq!(ctx.factor(ContextFactor::Travel, Side::Home), 1.0);
    }

    #[test]
    fn every_factor_stays_in_range() {
        let signals = json!({
            "pace": 0.1, "home_efficiency": 9.0, "away_efficiency": -3.0,
            "wind_mph": 90, "temperature_f": -40, "precipitation": 1,
            "home_rest_days": 10, "away_rest_days": 0,
            "home_travel_miles": 90000, "away_travel_miles": -5
        });
        let ctx = ContextNormalizer::new()
            .normalize(League::Nfl, &signals)
            .unwrap();
        for (factor, _, value) in ctx.iter() {
            let (lo, hi) = factor.range();
            assert!(value >= lo && value <= hi, "{factor:?} = {value}");
        }
    }
}
