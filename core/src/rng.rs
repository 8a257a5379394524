//! Deterministic random outcome generation.
//!
//! RULE: Nothing in the engine may call any platform RNG.
//! All randomness flows through an OutcomeRng seeded from the master
//! seed stored on the session row, so any run is replayable.

use crate::round::Outcome;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Source of per-round outcomes. The engine holds it behind a trait so
/// tests can script exact outcome sequences.
pub trait OutcomeSource: Send {
    /// Draw one binary outcome: Gain with probability `win_probability`,
    /// else Loss. Every call draws independently — no memoization.
    fn draw_outcome(&mut self, win_probability: f64) -> Outcome;
}

/// The production source: a seeded PCG stream.
pub struct OutcomeRng {
    inner: Pcg64Mcg,
}

impl OutcomeRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Advance the stream past `draws` already-consumed outcomes.
    /// Used when resuming a persisted session: recorded outcomes are
    /// never re-drawn, but the stream must continue where it left off.
    pub fn skip(&mut self, draws: usize) {
        for _ in 0..draws {
            self.next_f64();
        }
    }
}

impl OutcomeSource for OutcomeRng {
    fn draw_outcome(&mut self, win_probability: f64) -> Outcome {
        debug_assert!(
            win_probability > 0.0 && win_probability <= 1.0,
            "win_probability out of (0, 1]: {win_probability}"
        );
        if self.chance(win_probability) {
            Outcome::Gain
        } else {
            Outcome::Loss
        }
    }
}
