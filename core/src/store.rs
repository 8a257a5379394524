//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine calls store methods — it never executes SQL directly.
//! The store is what survives across request/response pauses; the
//! engine is reconstructed from it on resume.

use crate::{
    error::{SessionError, SessionResult},
    event::EventLogEntry,
    profile::Participant,
    round::RoundRecord,
    session::SessionState,
    types::{Ecu, RoundIndex, SessionId},
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SessionStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl SessionStore {
    pub fn open(path: &str) -> SessionResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SessionResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases this returns a fresh, isolated database.
    pub fn reopen(&self) -> SessionResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SessionResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Session ────────────────────────────────────────────────

    pub fn insert_session(&self, state: &SessionState) -> SessionResult<()> {
        self.conn.execute(
            "INSERT INTO session (session_id, seed, stage, round_index, endowment,
                consent, age, gender, condition, pending_outcome, started_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                state.session_id,
                state.seed as i64,
                state.stage.name(),
                state.round_index,
                state.endowment,
                state.consent as i64,
                state.profile.map(|p| p.age() as i64),
                state.profile.map(|p| p.gender().to_string()),
                state.condition.map(|c| c.to_string()),
                state.pending_outcome.map(|o| o.to_string()),
                state.started_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Persist the mutable columns after a command was applied.
    /// Round rows are appended separately — they are never rewritten.
    pub fn save_session(&self, state: &SessionState) -> SessionResult<()> {
        self.conn.execute(
            "UPDATE session
             SET stage=?1, round_index=?2, endowment=?3, consent=?4,
                 age=?5, gender=?6, condition=?7, pending_outcome=?8
             WHERE session_id=?9",
            params![
                state.stage.name(),
                state.round_index,
                state.endowment,
                state.consent as i64,
                state.profile.map(|p| p.age() as i64),
                state.profile.map(|p| p.gender().to_string()),
                state.condition.map(|c| c.to_string()),
                state.pending_outcome.map(|o| o.to_string()),
                state.session_id,
            ],
        )?;
        Ok(())
    }

    pub fn load_session(&self, session_id: &str) -> SessionResult<SessionState> {
        let row = self
            .conn
            .query_row(
                "SELECT seed, stage, round_index, endowment, consent,
                        age, gender, condition, pending_outcome, started_at
                 FROM session WHERE session_id=?1",
                params![session_id],
                |r| {
                    Ok((
                        r.get::<_, i64>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, u32>(2)?,
                        r.get::<_, i64>(3)?,
                        r.get::<_, i64>(4)?,
                        r.get::<_, Option<i64>>(5)?,
                        r.get::<_, Option<String>>(6)?,
                        r.get::<_, Option<String>>(7)?,
                        r.get::<_, Option<String>>(8)?,
                        r.get::<_, String>(9)?,
                    ))
                },
            )
            .optional()?
            .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))?;

        let (seed, stage, round_index, endowment, consent, age, gender, condition,
            pending_outcome, started_at) = row;

        let profile = match (age, gender) {
            (Some(age), Some(gender)) => {
                Some(Participant::new(age as u8, gender.parse()?)?)
            }
            _ => None,
        };

        Ok(SessionState {
            session_id: session_id.to_string(),
            seed: seed as u64,
            stage: stage.parse()?,
            round_index,
            endowment,
            history: self.rounds_for_session(session_id)?,
            consent: consent != 0,
            profile,
            condition: condition.map(|c| c.parse()).transpose()?,
            pending_outcome: pending_outcome.map(|o| o.parse()).transpose()?,
            started_at: DateTime::parse_from_rfc3339(&started_at)
                .map_err(|e| SessionError::Other(e.into()))?
                .with_timezone(&Utc),
        })
    }

    // ── Rounds ─────────────────────────────────────────────────

    pub fn append_round(&self, session_id: &SessionId, record: &RoundRecord) -> SessionResult<()> {
        self.conn.execute(
            "INSERT INTO round (session_id, round_index, outcome, decision, delta)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session_id,
                record.round_index,
                record.outcome.to_string(),
                record.decision.to_string(),
                record.delta,
            ],
        )?;
        Ok(())
    }

    pub fn rounds_for_session(&self, session_id: &str) -> SessionResult<Vec<RoundRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT round_index, outcome, decision, delta
             FROM round WHERE session_id=?1
             ORDER BY round_index ASC",
        )?;
        let raw = stmt
            .query_map(params![session_id], |r| {
                Ok((
                    r.get::<_, RoundIndex>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, Ecu>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(raw.len());
        for (round_index, outcome, decision, delta) in raw {
            records.push(RoundRecord {
                round_index,
                outcome: outcome.parse()?,
                decision: decision.parse()?,
                delta,
            });
        }
        Ok(records)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SessionResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (session_id, stage, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![entry.session_id, entry.stage, entry.event_type, entry.payload],
        )?;
        Ok(())
    }

    pub fn events_for_session(&self, session_id: &str) -> SessionResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, stage, event_type, payload
             FROM event_log WHERE session_id=?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![session_id], |r| {
                Ok(EventLogEntry {
                    id: Some(r.get(0)?),
                    session_id: r.get(1)?,
                    stage: r.get(2)?,
                    event_type: r.get(3)?,
                    payload: r.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
