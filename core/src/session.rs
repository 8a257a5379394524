//! Session state — the single authoritative record of one participant's
//! progress.
//!
//! RULES:
//!   - Stage transitions are strictly forward. No stage is revisited.
//!   - round_index only increases; history only grows.
//!   - The endowment changes only through record_round().
//!
//! Only the engine mutates this state. It is serde-derived because the
//! engine persists it across request/response pauses: the flow
//! controller itself is stateless between participant inputs.

use crate::{
    error::SessionError,
    profile::{Condition, Participant},
    round::{Decision, Outcome, RoundRecord},
    types::{Ecu, RoundIndex, SessionId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One step in the fixed sequential flow. Results is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Consent,
    Demographics,
    ConditionSelect,
    RoundLoop,
    Results,
}

impl Stage {
    /// The successor in the fixed ordering. Results maps to itself.
    pub fn next(self) -> Stage {
        match self {
            Self::Consent => Self::Demographics,
            Self::Demographics => Self::ConditionSelect,
            Self::ConditionSelect => Self::RoundLoop,
            Self::RoundLoop => Self::Results,
            Self::Results => Self::Results,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Consent => "consent",
            Self::Demographics => "demographics",
            Self::ConditionSelect => "condition_select",
            Self::RoundLoop => "round_loop",
            Self::Results => "results",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consent" => Ok(Self::Consent),
            "demographics" => Ok(Self::Demographics),
            "condition_select" => Ok(Self::ConditionSelect),
            "round_loop" => Ok(Self::RoundLoop),
            "results" => Ok(Self::Results),
            _ => Err(SessionError::UnknownLabel {
                kind:  "stage",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id:  SessionId,
    /// Master seed for the outcome stream. Stored so a run is replayable.
    pub seed:        u64,
    pub stage:       Stage,
    /// 1-based; points at the round currently being played.
    pub round_index: RoundIndex,
    pub endowment:   Ecu,
    /// Append-only, in round order.
    pub history:     Vec<RoundRecord>,
    pub consent:     bool,
    pub profile:     Option<Participant>,
    pub condition:   Option<Condition>,
    /// The drawn-but-not-yet-resolved outcome of the current round.
    /// Held here so it survives the pause while the participant decides.
    pub pending_outcome: Option<Outcome>,
    pub started_at:  DateTime<Utc>,
}

impl SessionState {
    pub fn new(session_id: SessionId, seed: u64, initial_endowment: Ecu) -> Self {
        Self {
            session_id,
            seed,
            stage: Stage::Consent,
            round_index: 1,
            endowment: initial_endowment,
            history: Vec::new(),
            consent: false,
            profile: None,
            condition: None,
            pending_outcome: None,
            started_at: Utc::now(),
        }
    }

    /// Move to the next stage in the fixed ordering. No-op at Results.
    pub fn advance_stage(&mut self) {
        self.stage = self.stage.next();
    }

    /// Append the round record for the current round_index, apply the
    /// delta to the endowment, and step to the next round.
    pub fn record_round(
        &mut self,
        outcome: Outcome,
        decision: Decision,
        delta: Ecu,
    ) -> RoundRecord {
        let record = RoundRecord {
            round_index: self.round_index,
            outcome,
            decision,
            delta,
        };
        self.history.push(record);
        self.endowment += delta;
        self.round_index += 1;
        self.pending_outcome = None;
        record
    }

    /// True once all rounds have been resolved.
    pub fn is_complete(&self, max_rounds: RoundIndex) -> bool {
        self.round_index > max_rounds
    }

    pub fn rounds_played(&self) -> usize {
        self.history.len()
    }
}
