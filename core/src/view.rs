//! Per-stage render payloads — the presentation boundary.
//!
//! The engine exposes, per stage, the data needed to render and the
//! inputs to collect. Rendering itself (forms, widgets, pages) is a
//! collaborator outside this crate; a view is plain data.

use crate::{
    report::ResultsReport,
    round::Outcome,
    types::{Ecu, RoundIndex},
};
use serde::Serialize;

pub const STUDY_TITLE: &str = "Expérience de Décision d'Investissement";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageView {
    Consent {
        study_title: &'static str,
    },
    Demographics {
        age_min: u8,
        age_max: u8,
        genders: Vec<&'static str>,
    },
    ConditionSelect {
        conditions: Vec<&'static str>,
    },
    Round {
        round_index: RoundIndex,
        outcome: Outcome,
        endowment: Ecu,
        decisions: Vec<&'static str>,
    },
    Results {
        report: ResultsReport,
    },
}
