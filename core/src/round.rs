//! Round vocabulary and the payoff rule.

use crate::{
    error::SessionError,
    types::{Ecu, RoundIndex},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Result of the per-round draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Gain,
    Loss,
}

impl Outcome {
    /// UI label from the French-language instrument.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gain => "Gain",
            Self::Loss => "Perte",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gain => "Gain",
            Self::Loss => "Loss",
        })
    }
}

impl FromStr for Outcome {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gain" => Ok(Self::Gain),
            "loss" | "perte" => Ok(Self::Loss),
            _ => Err(SessionError::UnknownLabel {
                kind:  "outcome",
                value: s.to_string(),
            }),
        }
    }
}

/// The participant's choice each round: keep the position or sell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Keep,
    Sell,
}

impl Decision {
    pub const ALL: [Decision; 2] = [Decision::Keep, Decision::Sell];

    /// UI label from the French-language instrument.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Keep => "Conserver",
            Self::Sell => "Vendre",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keep => "Keep",
            Self::Sell => "Sell",
        })
    }
}

impl FromStr for Decision {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" | "conserver" => Ok(Self::Keep),
            "sell" | "vendre" => Ok(Self::Sell),
            _ => Err(SessionError::UnknownLabel {
                kind:  "decision",
                value: s.to_string(),
            }),
        }
    }
}

/// The payoff rule. Pure and total over the 2×2 domain:
///
///   (Gain, Keep) → +stake
///   (Loss, Keep) → -stake
///   (Loss, Sell) →  0
///   (Gain, Sell) →  0
///
/// Selling always settles at zero, including on a winning draw: the
/// gain is forfeited. That last case is the instrument's documented
/// behavior, not an oversight to be corrected here.
pub fn compute_delta(outcome: Outcome, decision: Decision, stake: Ecu) -> Ecu {
    match (outcome, decision) {
        (Outcome::Gain, Decision::Keep) => stake,
        (Outcome::Loss, Decision::Keep) => -stake,
        (_, Decision::Sell) => 0,
    }
}

/// One completed round. Appended to the session history at confirmation
/// time and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round_index: RoundIndex,
    pub outcome:     Outcome,
    pub decision:    Decision,
    pub delta:       Ecu,
}
