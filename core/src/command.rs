use crate::{
    profile::{Condition, Gender},
    round::Decision,
};
use serde::{Deserialize, Serialize};

/// All participant-issued inputs, one per gated stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ParticipantCommand {
    GiveConsent { accepted: bool },
    SubmitProfile { age: u8, gender: Gender },
    SelectCondition { condition: Condition },
    SubmitDecision { decision: Decision },
}

impl ParticipantCommand {
    /// Stable name used in refusal messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GiveConsent { .. } => "give_consent",
            Self::SubmitProfile { .. } => "submit_profile",
            Self::SelectCondition { .. } => "select_condition",
            Self::SubmitDecision { .. } => "submit_decision",
        }
    }
}
