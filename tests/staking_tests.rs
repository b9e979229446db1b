//! Fractional Kelly sizing.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sharpline::application::staking::{kelly_fraction, KellyStaker, StakingPolicy};
use sharpline::domain::Odds;
use sharpline::error::Error;

fn odds(american: f64) -> Odds {
    Odds::american(american).unwrap()
}

proptest! {
    #[test]
    fn kelly_is_monotonic_in_edge(a in 0.0f64..2.0, b in 0.0f64..2.0, price in 100.0f64..500.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let o = odds(price);
        prop_assert!(kelly_fraction(lo, &o) <= kelly_fraction(hi, &o));
    }

    #[test]
    fn stake_never_exceeds_the_cap(edge in -1.0f64..5.0, price in -1000.0f64..-100.0) {
        let rec = KellyStaker::default()
            .recommend(edge, &odds(price), dec!(10000))
            .unwrap();
        prop_assert!(rec.stake >= Decimal::ZERO);
        prop_assert!(rec.stake <= dec!(500));
        prop_assert!(rec.capped_fraction <= 0.05);
    }
}

#[test]
fn quarter_kelly_example() {
    // 54% at -110 on a 1000 bankroll.
    let o = odds(-110.0);
    let edge = 0.54 * o.to_decimal() - 1.0;
    let rec = KellyStaker::default().recommend(edge, &o, dec!(1000)).unwrap();
    assert_eq!(rec.stake, dec!(8.50));
    assert!(rec.is_bet());
}

#[test]
fn negative_edge_never_bets() {
    let rec = KellyStaker::default()
        .recommend(-0.1, &odds(150.0), dec!(1000))
        .unwrap();
    assert_eq!(rec, sharpline::domain::StakeRecommendation::no_bet(dec!(1000)));
}

#[test]
fn league_policy_changes_the_cap() {
    let cautious = KellyStaker::new(StakingPolicy {
        kelly_multiplier: 0.1,
        max_stake_fraction: 0.01,
        min_edge: 0.0,
    });
    let rec = cautious.recommend(0.5, &odds(100.0), dec!(2000)).unwrap();
    assert_eq!(rec.capped_fraction, 0.01);
    assert_eq!(rec.stake, dec!(20.00));
}

#[test]
fn bankroll_must_be_positive() {
    let err = KellyStaker::default()
        .recommend(0.05, &odds(-110.0), dec!(0))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidBankroll { bankroll } if bankroll.is_zero()));
}
