//! Probability calibration.
//!
//! Raw simulated probabilities overstate certainty. Calibration pulls them
//! toward 0.5 (`shrinkage`), clamps them into a band (`cap`), remaps them
//! through an empirical curve (`historical`) or chains the two (`combined`).
//! Every output is nudged strictly inside (0, 1).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::error::ValidationError;
use crate::domain::{CalibratedProbability, CalibrationMethod};

pub const DEFAULT_SHRINK_FACTOR: f64 = 0.8;
pub const DEFAULT_FLOOR: f64 = 0.15;
pub const DEFAULT_CEILING: f64 = 0.85;
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Calibration parameters for one league.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationParams {
    pub method: CalibrationMethod,
    /// In (0, 1]; 1 leaves probabilities unchanged.
    pub shrink_factor: f64,
    pub floor: f64,
    pub ceiling: f64,
    /// Minimum distance kept from 0 and 1.
    pub epsilon: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            method: CalibrationMethod::Combined,
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            floor: DEFAULT_FLOOR,
            ceiling: DEFAULT_CEILING,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Monotone piecewise-linear map from predicted to observed win rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCurve {
    /// `(predicted, observed)` knots, strictly increasing in `predicted` and
    /// non-decreasing in `observed`.
    points: Vec<(f64, f64)>,
    /// Replaces the configured cap band when present.
    bounds: Option<(f64, f64)>,
}

impl CalibrationCurve {
    /// Fit a curve from past `(predicted, won)` pairs.
    ///
    /// Predictions are grouped into `bins` equal-width bins on [0, 1]. Each
    /// non-empty bin contributes a knot at its mean prediction and observed
    /// win rate; adjacent violators are then pooled (weighted by count) until
    /// the observed rates are non-decreasing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCalibrationCurve`] for empty history
    /// or zero bins, and [`ValidationError::InvalidProbability`] for a
    /// prediction outside [0, 1].
    pub fn fit(history: &[(f64, bool)], bins: usize) -> Result<Self, ValidationError> {
        if history.is_empty() {
            return Err(invalid_curve("history is empty"));
        }
        if bins == 0 {
            return Err(invalid_curve("bin count must be positive"));
        }

        // (sum predicted, wins, count) per bin
        let mut acc = vec![(0.0, 0.0, 0.0); bins];
        for &(predicted, won) in history {
            check_probability("predicted", predicted)?;
            let index = ((predicted * bins as f64) as usize).min(bins - 1);
            let bin = &mut acc[index];
            bin.0 += predicted;
            bin.1 += if won { 1.0 } else { 0.0 };
            bin.2 += 1.0;
        }

        let blocks: Vec<Block> = acc
            .into_iter()
            .filter(|(_, _, n)| *n > 0.0)
            .map(|(sum_p, wins, n)| Block {
                x: sum_p / n,
                y: wins / n,
                weight: n,
            })
            .collect();
        let points = pool_adjacent_violators(blocks);

        debug!(knots = points.len(), samples = history.len(), "Calibration curve fitted");
        Ok(Self {
            points,
            bounds: None,
        })
    }

    /// Build a curve from explicit knots.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCalibrationCurve`] unless the knots
    /// are non-empty, strictly increasing in `predicted`, non-decreasing in
    /// `observed`, and all within [0, 1].
    pub fn from_points(points: Vec<(f64, f64)>) -> Result<Self, ValidationError> {
        if points.is_empty() {
            return Err(invalid_curve("curve needs at least one point"));
        }
        for &(x, y) in &points {
            check_probability("curve predicted", x)?;
            check_probability("curve observed", y)?;
        }
        if points.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(invalid_curve("predicted values must be strictly increasing"));
        }
        if points.windows(2).any(|w| w[1].1 < w[0].1) {
            return Err(invalid_curve("observed values must be non-decreasing"));
        }
        Ok(Self {
            points,
            bounds: None,
        })
    }

    /// Attach bounds that replace the configured cap band.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCalibrationCurve`] unless
    /// `0 <= floor < ceiling <= 1`.
    pub fn with_bounds(mut self, floor: f64, ceiling: f64) -> Result<Self, ValidationError> {
        check_probability("curve floor", floor)?;
        check_probability("curve ceiling", ceiling)?;
        if floor >= ceiling {
            return Err(invalid_curve("floor must be below ceiling"));
        }
        self.bounds = Some((floor, ceiling));
        Ok(self)
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub const fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }

    /// Map a raw probability through the curve.
    ///
    /// Flat beyond the first and last knots.
    #[must_use]
    pub fn apply(&self, p: f64) -> f64 {
        let (Some(&first), Some(&last)) = (self.points.first(), self.points.last()) else {
            return p;
        };
        if p <= first.0 {
            return first.1;
        }
        if p >= last.0 {
            return last.1;
        }
        let upper = self.points.partition_point(|&(x, _)| x <= p);
        let (x0, y0) = self.points[upper - 1];
        let (x1, y1) = self.points[upper];
        y0 + (y1 - y0) * (p - x0) / (x1 - x0)
    }
}

struct Block {
    x: f64,
    y: f64,
    weight: f64,
}

/// Merge neighbouring blocks until `y` is non-decreasing.
fn pool_adjacent_violators(blocks: Vec<Block>) -> Vec<(f64, f64)> {
    let mut stack: Vec<Block> = Vec::with_capacity(blocks.len());
    for mut current in blocks {
        while stack.last().is_some_and(|prev| prev.y > current.y) {
            if let Some(prev) = stack.pop() {
                let weight = prev.weight + current.weight;
                current = Block {
                    x: (prev.x * prev.weight + current.x * current.weight) / weight,
                    y: (prev.y * prev.weight + current.y * current.weight) / weight,
                    weight,
                };
            }
        }
        stack.push(current);
    }
    stack.into_iter().map(|b| (b.x, b.y)).collect()
}

/// Applies the configured calibration method.
#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    params: CalibrationParams,
    curve: Option<CalibrationCurve>,
}

impl Calibrator {
    pub fn new(params: CalibrationParams) -> Self {
        Self {
            params,
            curve: None,
        }
    }

    /// Use an empirical curve for the `historical` and `combined` methods.
    #[must_use]
    pub fn with_curve(mut self, curve: CalibrationCurve) -> Self {
        self.curve = Some(curve);
        self
    }

    pub const fn params(&self) -> &CalibrationParams {
        &self.params
    }

    pub fn curve(&self) -> Option<&CalibrationCurve> {
        self.curve.as_ref()
    }

    /// Calibrate with the configured method.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProbability`] if `raw` is not a
    /// probability.
    pub fn calibrate(&self, raw: f64) -> Result<CalibratedProbability, ValidationError> {
        self.calibrate_with(raw, self.params.method)
    }

    /// Calibrate with an explicit method.
    ///
    /// `historical` without a curve falls back to shrinkage and is tagged as
    /// such.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProbability`] if `raw` is not a
    /// probability.
    pub fn calibrate_with(
        &self,
        raw: f64,
        method: CalibrationMethod,
    ) -> Result<CalibratedProbability, ValidationError> {
        check_probability("raw", raw)?;

        let (value, used) = match method {
            CalibrationMethod::Shrinkage => (self.shrink(raw), CalibrationMethod::Shrinkage),
            CalibrationMethod::Cap => (self.cap(raw), CalibrationMethod::Cap),
            CalibrationMethod::Historical => match &self.curve {
                Some(curve) => (curve.apply(raw), CalibrationMethod::Historical),
                None => {
                    warn!("Historical calibration requested without a curve, using shrinkage");
                    (self.shrink(raw), CalibrationMethod::Shrinkage)
                }
            },
            CalibrationMethod::Combined => {
                let base = match &self.curve {
                    Some(curve) => curve.apply(raw),
                    None => self.shrink(raw),
                };
                (self.cap(base), CalibrationMethod::Combined)
            }
        };

        Ok(CalibratedProbability {
            raw,
            calibrated: self.nudge(value),
            method: used,
        })
    }

    /// Calibrate a named set of raw probabilities.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid probability, naming it.
    pub fn calibrate_all<'a, I>(
        &self,
        raw: I,
    ) -> Result<BTreeMap<String, CalibratedProbability>, ValidationError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        raw.into_iter()
            .map(|(name, p)| {
                check_probability(name, p)?;
                Ok((name.to_string(), self.calibrate(p)?))
            })
            .collect()
    }

    fn shrink(&self, p: f64) -> f64 {
        0.5 + (p - 0.5) * self.params.shrink_factor
    }

    fn cap(&self, p: f64) -> f64 {
        let (floor, ceiling) = self
            .curve
            .as_ref()
            .and_then(CalibrationCurve::bounds)
            .unwrap_or((self.params.floor, self.params.ceiling));
        p.clamp(floor, ceiling)
    }

    fn nudge(&self, p: f64) -> f64 {
        let eps = self.params.epsilon.max(f64::EPSILON);
        p.clamp(eps, 1.0 - eps)
    }
}

fn check_probability(label: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidProbability {
            label: label.to_string(),
            value,
        })
    }
}

fn invalid_curve(reason: &str) -> ValidationError {
    ValidationError::InvalidCalibrationCurve {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrator() -> Calibrator {
        Calibrator::new(CalibrationParams::default())
    }

    #[test]
    fn shrinkage_pulls_toward_half() {
        let c = calibrator()
            .calibrate_with(0.9, CalibrationMethod::Shrinkage)
            .unwrap();
        assert!((c.calibrated - 0.82).abs() < 1e-12);
        assert_eq!(c.method, CalibrationMethod::Shrinkage);
    }

    #[test]
    fn cap_clamps_extremes() {
        let low = calibrator().calibrate_with(0.02, CalibrationMethod::Cap).unwrap();
        let high = calibrator().calibrate_with(0.99, CalibrationMethod::Cap).unwrap();
        assert_eq!(low.calibrated, 0.15);
        assert_eq!(high.calibrated, 0.85);
    }

    #[test]
    fn combined_shrinks_then_caps() {
        let c = calibrator().calibrate(1.0).unwrap();
        // 0.5 + 0.5 * 0.8 = 0.9, capped to 0.85
        assert_eq!(c.calibrated, 0.85);
        assert_eq!(c.method, CalibrationMethod::Combined);
    }

    #[test]
    fn boundary_probabilities_are_nudged_inward() {
        let params = CalibrationParams {
            shrink_factor: 1.0,
            ..CalibrationParams::default()
        };
        let c = Calibrator::new(params)
            .calibrate_with(1.0, CalibrationMethod::Shrinkage)
            .unwrap();
        assert!(c.calibrated < 1.0);
        assert!((c.calibrated - (1.0 - DEFAULT_EPSILON)).abs() < 1e-15);
    }

    #[test]
    fn historical_without_curve_falls_back_to_shrinkage() {
        let c = calibrator()
            .calibrate_with(0.7, CalibrationMethod::Historical)
            .unwrap();
        assert_eq!(c.method, CalibrationMethod::Shrinkage);
        assert!((c.calibrated - 0.66).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_raw_is_rejected() {
        let err = calibrator().calibrate(1.2).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidProbability { .. }));
        assert!(calibrator().calibrate(f64::NAN).is_err());
    }

    #[test]
    fn fitted_curve_is_monotone() {
        // Bin 0.6-0.7 wins less often than bin 0.5-0.6 and must be pooled.
        let mut history = Vec::new();
        history.extend((0..10).map(|i| (0.55, i < 7)));
        history.extend((0..10).map(|i| (0.65, i < 5)));
        history.extend((0..10).map(|i| (0.75, i < 8)));
        let curve = CalibrationCurve::fit(&history, 10).unwrap();

        let ys: Vec<f64> = curve.points().iter().map(|p| p.1).collect();
        assert!(ys.windows(2).all(|w| w[0] <= w[1]), "{ys:?}");
        assert_eq!(curve.points().len(), 2);
        assert!((curve.points()[0].1 - 0.6).abs() < 1e-12);
    }

    #[test]
    fn curve_interpolates_between_knots() {
        let curve = CalibrationCurve::from_points(vec![(0.2, 0.3), (0.8, 0.6)]).unwrap();
        assert!((curve.apply(0.5) - 0.45).abs() < 1e-12);
        assert_eq!(curve.apply(0.0), 0.3);
        assert_eq!(curve.apply(1.0), 0.6);
    }

    #[test]
    fn curve_bounds_override_cap() {
        let curve = CalibrationCurve::from_points(vec![(0.0, 0.0), (1.0, 1.0)])
            .unwrap()
            .with_bounds(0.05, 0.95)
            .unwrap();
        let c = calibrator().with_curve(curve).calibrate(0.99).unwrap();
        assert_eq!(c.calibrated, 0.95);
    }

    #[test]
    fn unsorted_points_are_rejected() {
        assert!(CalibrationCurve::from_points(vec![(0.6, 0.5), (0.4, 0.6)]).is_err());
        assert!(CalibrationCurve::from_points(vec![(0.4, 0.6), (0.6, 0.5)]).is_err());
    }

    #[test]
    fn calibrate_all_keeps_names() {
        let out = calibrator()
            .calibrate_all([("home_ml", 0.7), ("over", 0.4)])
            .unwrap();
        assert_eq!(out.len(), 2);
        assert!((out["home_ml"].calibrated - 0.66).abs() < 1e-12);

        let err = calibrator().calibrate_all([("bad", 2.0)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidProbability {
                label: "bad".to_string(),
                value: 2.0
            }
        );
    }
}
