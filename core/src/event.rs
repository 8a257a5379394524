//! Session events — the observable record of every state change.
//!
//! RULE: The engine records every mutation in the event log. The
//! presentation layer decides what to render next from the returned
//! events; there is no implicit control-flow jump.

use crate::{
    profile::{Condition, Gender},
    round::{Decision, Outcome},
    types::{Ecu, RoundIndex, SessionId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted {
        session_id: SessionId,
        seed: u64,
    },
    ConsentRecorded,
    ProfileRecorded {
        age: u8,
        gender: Gender,
    },
    ConditionSelected {
        condition: Condition,
    },
    /// The current round's gamble has been drawn and is awaiting the
    /// participant's decision.
    OutcomeDrawn {
        round_index: RoundIndex,
        outcome: Outcome,
    },
    /// A round resolved atomically: outcome + decision + payoff.
    RoundResolved {
        round_index: RoundIndex,
        outcome: Outcome,
        decision: Decision,
        delta: Ecu,
        endowment: Ecu,
    },
    SessionCompleted {
        final_endowment: Ecu,
    },
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub session_id: SessionId,
    pub stage: String,
    pub event_type: String,
    pub payload: String, // JSON-serialized SessionEvent
}
