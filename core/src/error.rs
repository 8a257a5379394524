use crate::session::Stage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A gated transition refused the input. Recoverable: the caller
    /// re-presents the current stage; state is unchanged.
    #[error("{stage} stage refused: {reason}")]
    StageRefused { stage: Stage, reason: String },

    #[error("Invalid experiment config: {0}")]
    InvalidConfig(String),

    #[error("Unrecognized {kind} value: '{value}'")]
    UnknownLabel { kind: &'static str, value: String },

    #[error("Session '{0}' not found")]
    SessionNotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
