//! Payoff rule tests.
//!
//! The rule is pure and total over the 2×2 (outcome × decision) domain.
//! Only the Keep branches move money; selling settles at zero even on a
//! winning draw — that is the instrument's documented behavior.

use investlab_core::round::{compute_delta, Decision, Outcome};

#[test]
fn keep_on_gain_wins_the_stake() {
    assert_eq!(compute_delta(Outcome::Gain, Decision::Keep, 10), 10);
}

#[test]
fn keep_on_loss_loses_the_stake() {
    assert_eq!(compute_delta(Outcome::Loss, Decision::Keep, 10), -10);
}

#[test]
fn sell_on_loss_settles_at_zero() {
    assert_eq!(compute_delta(Outcome::Loss, Decision::Sell, 10), 0);
}

#[test]
fn sell_on_gain_forfeits_the_gain() {
    assert_eq!(compute_delta(Outcome::Gain, Decision::Sell, 10), 0);
}

#[test]
fn rule_is_total_and_only_keep_moves_money() {
    for outcome in [Outcome::Gain, Outcome::Loss] {
        for decision in Decision::ALL {
            let delta = compute_delta(outcome, decision, 10);
            match decision {
                Decision::Keep => assert_eq!(delta.abs(), 10,
                    "Keep must move the full stake for {outcome}"),
                Decision::Sell => assert_eq!(delta, 0,
                    "Sell must settle at zero for {outcome}"),
            }
        }
    }
}

#[test]
fn delta_scales_with_the_stake() {
    assert_eq!(compute_delta(Outcome::Gain, Decision::Keep, 25), 25);
    assert_eq!(compute_delta(Outcome::Loss, Decision::Keep, 25), -25);
    assert_eq!(compute_delta(Outcome::Gain, Decision::Keep, 0), 0);
}
