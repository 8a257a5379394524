//! Session state bookkeeping invariants.
//!
//! After N recorded rounds: endowment = initial + Σ deltas, history
//! holds N records in round order, and the round counter sits at N+1.

use investlab_core::round::{Decision, Outcome, RoundRecord};
use investlab_core::session::{SessionState, Stage};

fn state() -> SessionState {
    SessionState::new("inv-test".into(), 1, 100)
}

#[test]
fn endowment_tracks_the_sum_of_deltas() {
    let mut s = state();
    let script = [
        (Outcome::Gain, Decision::Keep, 10),
        (Outcome::Loss, Decision::Keep, -10),
        (Outcome::Loss, Decision::Sell, 0),
        (Outcome::Gain, Decision::Keep, 10),
        (Outcome::Gain, Decision::Sell, 0),
    ];
    for (outcome, decision, delta) in script {
        s.record_round(outcome, decision, delta);
    }
    let sum: i64 = script.iter().map(|(_, _, d)| d).sum();
    assert_eq!(s.endowment, 100 + sum);
    assert_eq!(s.rounds_played(), script.len());
    assert_eq!(s.round_index, script.len() as u32 + 1);
}

#[test]
fn history_grows_in_round_order() {
    let mut s = state();
    s.record_round(Outcome::Gain, Decision::Keep, 10);
    s.record_round(Outcome::Loss, Decision::Sell, 0);
    let indices: Vec<u32> = s.history.iter().map(|r| r.round_index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert_eq!(
        s.history[0],
        RoundRecord {
            round_index: 1,
            outcome:     Outcome::Gain,
            decision:    Decision::Keep,
            delta:       10,
        }
    );
}

#[test]
fn record_round_clears_the_pending_outcome() {
    let mut s = state();
    s.pending_outcome = Some(Outcome::Gain);
    s.record_round(Outcome::Gain, Decision::Keep, 10);
    assert_eq!(s.pending_outcome, None);
}

#[test]
fn is_complete_flips_after_the_last_round() {
    let mut s = state();
    for _ in 0..5 {
        assert!(!s.is_complete(5));
        s.record_round(Outcome::Loss, Decision::Sell, 0);
    }
    assert!(s.is_complete(5));
}

#[test]
fn stage_order_is_fixed_and_results_is_terminal() {
    assert_eq!(Stage::Consent.next(), Stage::Demographics);
    assert_eq!(Stage::Demographics.next(), Stage::ConditionSelect);
    assert_eq!(Stage::ConditionSelect.next(), Stage::RoundLoop);
    assert_eq!(Stage::RoundLoop.next(), Stage::Results);
    assert_eq!(Stage::Results.next(), Stage::Results);

    let mut s = state();
    s.stage = Stage::Results;
    s.advance_stage();
    assert_eq!(s.stage, Stage::Results, "advance at Results must be a no-op");
}
