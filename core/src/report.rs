//! Results reporting and CSV export.

use crate::{
    error::SessionResult,
    profile::Condition,
    round::RoundRecord,
    session::SessionState,
    types::Ecu,
};
use chrono::Local;
use serde::Serialize;
use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

/// Flat tabular view of a session's history plus the summary fields.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsReport {
    pub rows: Vec<RoundRecord>,
    pub final_endowment: Ecu,
    pub condition: Option<Condition>,
}

/// Rows come out in round order because the history is append-only.
pub fn build_report(state: &SessionState) -> ResultsReport {
    ResultsReport {
        rows: state.history.clone(),
        final_endowment: state.endowment,
        condition: state.condition,
    }
}

impl ResultsReport {
    /// Render the tabular record. Identical history produces identical
    /// output; the timestamp lives in the filename, not the content.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("Round,Outcome,Decision,Gain/Loss\n");
        for row in &self.rows {
            // All fields format without commas or quotes.
            let _ = writeln!(
                out,
                "{},{},{},{}",
                row.round_index, row.outcome, row.decision, row.delta
            );
        }
        out
    }

    /// Write the artifact into `dir`, filename stamped to the second.
    /// I/O failure is surfaced to the operator, never retried.
    pub fn export(&self, dir: &Path) -> SessionResult<PathBuf> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("results_experience_{stamp}.csv"));
        std::fs::write(&path, self.to_csv())?;
        log::info!("results exported to {}", path.display());
        Ok(path)
    }
}
