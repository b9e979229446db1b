//! Calibration properties over the whole probability range.

use proptest::prelude::*;
use sharpline::application::calibration::{CalibrationCurve, CalibrationParams, Calibrator};
use sharpline::domain::error::ValidationError;
use sharpline::domain::CalibrationMethod;

fn calibrator(method: CalibrationMethod) -> Calibrator {
    Calibrator::new(CalibrationParams {
        method,
        ..CalibrationParams::default()
    })
}

proptest! {
    #[test]
    fn cap_stays_inside_the_band(p in 0.0f64..=1.0) {
        let c = calibrator(CalibrationMethod::Cap).calibrate(p).unwrap();
        prop_assert!((0.15..=0.85).contains(&c.calibrated));
    }

    #[test]
    fn combined_stays_inside_the_band(p in 0.0f64..=1.0) {
        let c = calibrator(CalibrationMethod::Combined).calibrate(p).unwrap();
        prop_assert!((0.15..=0.85).contains(&c.calibrated));
    }

    #[test]
    fn combined_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let cal = calibrator(CalibrationMethod::Combined);
        prop_assert!(cal.calibrate(lo).unwrap().calibrated <= cal.calibrate(hi).unwrap().calibrated);
    }

    #[test]
    fn shrinkage_pulls_toward_even(p in 0.0f64..=1.0) {
        let c = calibrator(CalibrationMethod::Shrinkage).calibrate(p).unwrap();
        prop_assert!((c.calibrated - 0.5).abs() <= (p - 0.5).abs() + 1e-12);
        prop_assert!(c.calibrated > 0.0 && c.calibrated < 1.0);
    }

    #[test]
    fn fitted_curve_is_monotonic(
        history in prop::collection::vec((0.0f64..=1.0, any::<bool>()), 1..300),
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
    ) {
        let curve = CalibrationCurve::fit(&history, 10).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(curve.apply(lo) <= curve.apply(hi) + 1e-12);
    }
}

#[test]
fn shrinkage_example() {
    let c = calibrator(CalibrationMethod::Shrinkage).calibrate(0.7).unwrap();
    assert!((c.calibrated - 0.66).abs() < 1e-12);
    assert_eq!(c.raw, 0.7);
}

#[test]
fn certain_outcomes_never_reach_zero_or_one() {
    let cal = Calibrator::new(CalibrationParams {
        method: CalibrationMethod::Shrinkage,
        shrink_factor: 1.0,
        ..CalibrationParams::default()
    });
    let high = cal.calibrate(1.0).unwrap().calibrated;
    let low = cal.calibrate(0.0).unwrap().calibrated;
    assert!(high < 1.0);
    assert!(low > 0.0);
}

#[test]
fn historical_without_curve_falls_back_to_shrinkage() {
    let c = calibrator(CalibrationMethod::Historical).calibrate(0.7).unwrap();
    assert_eq!(c.method, CalibrationMethod::Shrinkage);
    assert!((c.calibrated - 0.66).abs() < 1e-12);
}

#[test]
fn historical_uses_the_fitted_curve() {
    // Predictions near 0.8 won only 60% of the time.
    let mut history = Vec::new();
    for i in 0..100 {
        history.push((0.8, i % 5 < 3));
        history.push((0.2, i % 5 == 0));
    }
    let curve = CalibrationCurve::fit(&history, 10).unwrap();
    let cal = calibrator(CalibrationMethod::Historical).with_curve(curve);

    let c = cal.calibrate(0.8).unwrap();
    assert_eq!(c.method, CalibrationMethod::Historical);
    assert!((c.calibrated - 0.6).abs() < 1e-9);
}

#[test]
fn curve_bounds_replace_the_band() {
    let curve = CalibrationCurve::from_points(vec![(0.0, 0.0), (1.0, 1.0)])
        .unwrap()
        .with_bounds(0.3, 0.7)
        .unwrap();
    let cal = calibrator(CalibrationMethod::Combined).with_curve(curve);
    assert!((cal.calibrate(0.95).unwrap().calibrated - 0.7).abs() < 1e-12);
    assert!((cal.calibrate(0.05).unwrap().calibrated - 0.3).abs() < 1e-12);
}

#[test]
fn non_monotonic_points_are_rejected() {
    let err = CalibrationCurve::from_points(vec![(0.2, 0.5), (0.8, 0.4)]).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidCalibrationCurve { .. }));
}

#[test]
fn calibrate_all_names_the_bad_probability() {
    let cal = calibrator(CalibrationMethod::Combined);
    let err = cal
        .calibrate_all([("home", 0.6), ("away", 1.4)])
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidProbability {
            label: "away".to_string(),
            value: 1.4
        }
    );

    let all = cal.calibrate_all([("home", 0.6), ("away", 0.4)]).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all["home"].calibrated > all["away"].calibrated);
}
