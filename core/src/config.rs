//! Experiment parameters.
//!
//! The instrument runs with fixed constants; `Default` reproduces them
//! exactly. A JSON override file can change them for pilot runs, but a
//! config is validated once at load and never mutated mid-session.

use crate::{
    error::{SessionError, SessionResult},
    types::{Ecu, RoundIndex},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Probability the per-round draw comes up Gain. Must be in (0, 1].
    pub win_probability: f64,
    /// Amount at stake each round.
    pub stake: Ecu,
    /// Endowment the participant starts with.
    pub initial_endowment: Ecu,
    /// Number of rounds in the round loop.
    pub max_rounds: RoundIndex,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            win_probability:   0.5,
            stake:             10,
            initial_endowment: 100,
            max_rounds:        5,
        }
    }
}

impl ExperimentConfig {
    /// Load an override file. Missing fields fall back to the defaults.
    pub fn load(path: &Path) -> SessionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Operator input, so out-of-range values are a load-time error,
    /// not a participant-recoverable refusal.
    pub fn validate(&self) -> SessionResult<()> {
        if !(self.win_probability > 0.0 && self.win_probability <= 1.0) {
            return Err(SessionError::InvalidConfig(format!(
                "win_probability must be in (0, 1], got {}",
                self.win_probability
            )));
        }
        if self.max_rounds == 0 {
            return Err(SessionError::InvalidConfig(
                "max_rounds must be at least 1".into(),
            ));
        }
        if self.stake < 0 {
            return Err(SessionError::InvalidConfig(format!(
                "stake must be non-negative, got {}",
                self.stake
            )));
        }
        Ok(())
    }
}
