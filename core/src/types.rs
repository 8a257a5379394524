//! Shared primitive types used across the entire session engine.

/// The canonical session identifier. One session = one participant run.
pub type SessionId = String;

/// 1-based round counter within the round loop.
pub type RoundIndex = u32;

/// Experimental Currency Unit — the endowment's unit of account.
/// Signed: deltas can be negative.
pub type Ecu = i64;
