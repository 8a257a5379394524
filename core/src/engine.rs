//! The stage machine — the heart of the experiment flow.
//!
//! STAGE ORDER (fixed, documented, never reordered):
//!   Consent → Demographics → ConditionSelect → RoundLoop(1..=5) → Results
//!
//! RULES:
//!   - Every transition is gated on the previous stage's completion.
//!   - A refused command leaves the state untouched; the caller
//!     re-presents the current stage.
//!   - A round is atomic: drawn outcome, decision, and payoff are
//!     recorded together when the decision is confirmed.
//!   - All randomness flows through the OutcomeSource.
//!   - All state changes are recorded in the event log.

use crate::{
    command::ParticipantCommand,
    config::ExperimentConfig,
    error::{SessionError, SessionResult},
    event::{EventLogEntry, SessionEvent},
    profile::{Condition, Gender, Participant, AGE_MAX, AGE_MIN},
    report::build_report,
    rng::{OutcomeRng, OutcomeSource},
    round::{compute_delta, Decision, Outcome},
    session::{SessionState, Stage},
    store::SessionStore,
    types::SessionId,
    view::{StageView, STUDY_TITLE},
};
use uuid::Uuid;

pub struct SessionEngine {
    pub store: SessionStore,
    config:    ExperimentConfig,
    outcomes:  Box<dyn OutcomeSource>,
    pub state: SessionState,
}

impl SessionEngine {
    /// Start a fresh session with a generated id.
    pub fn create(
        store: SessionStore,
        config: ExperimentConfig,
        seed: u64,
    ) -> SessionResult<Self> {
        Self::create_with_id(store, config, seed, Uuid::new_v4().to_string())
    }

    /// Start a fresh session under a caller-chosen id. Tests use this to
    /// make two runs byte-comparable.
    pub fn create_with_id(
        store: SessionStore,
        config: ExperimentConfig,
        seed: u64,
        session_id: SessionId,
    ) -> SessionResult<Self> {
        config.validate()?;
        let state = SessionState::new(session_id, seed, config.initial_endowment);
        store.insert_session(&state)?;

        let engine = Self {
            store,
            config,
            outcomes: Box::new(OutcomeRng::new(seed)),
            state,
        };
        let started = SessionEvent::SessionStarted {
            session_id: engine.state.session_id.clone(),
            seed,
        };
        engine.persist_events(Stage::Consent, std::slice::from_ref(&started))?;
        log::info!("session {} created (seed {seed})", engine.state.session_id);
        Ok(engine)
    }

    /// Rebuild an engine from persisted state. The controller holds
    /// nothing across pauses, so this is the normal path between
    /// participant inputs. The outcome stream is re-seeded and advanced
    /// past the draws already recorded — recorded outcomes are never
    /// drawn again.
    pub fn resume(
        store: SessionStore,
        config: ExperimentConfig,
        session_id: &str,
    ) -> SessionResult<Self> {
        config.validate()?;
        let state = store.load_session(session_id)?;
        let mut rng = OutcomeRng::new(state.seed);
        rng.skip(state.history.len() + usize::from(state.pending_outcome.is_some()));
        log::info!("session {session_id} resumed at stage {}", state.stage);
        Ok(Self {
            store,
            config,
            outcomes: Box::new(rng),
            state,
        })
    }

    /// Swap the outcome source. Must be called before the round loop
    /// begins; tests use it to script exact outcome sequences.
    pub fn with_outcome_source(mut self, outcomes: Box<dyn OutcomeSource>) -> Self {
        self.outcomes = outcomes;
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Apply one participant command against the current stage.
    ///
    /// On success the new state and all emitted events are persisted and
    /// the events returned. A guard violation returns StageRefused and
    /// leaves both state and store untouched.
    pub fn apply(&mut self, command: ParticipantCommand) -> SessionResult<Vec<SessionEvent>> {
        let stage = self.state.stage;
        let events = match (stage, command) {
            (Stage::Consent, ParticipantCommand::GiveConsent { accepted }) => {
                if !accepted {
                    return Err(self.refuse("explicit affirmative consent is required"));
                }
                self.state.consent = true;
                self.state.advance_stage();
                vec![SessionEvent::ConsentRecorded]
            }

            (Stage::Demographics, ParticipantCommand::SubmitProfile { age, gender }) => {
                let participant = Participant::new(age, gender)?;
                self.state.profile = Some(participant);
                self.state.advance_stage();
                vec![SessionEvent::ProfileRecorded { age, gender }]
            }

            (Stage::ConditionSelect, ParticipantCommand::SelectCondition { condition }) => {
                self.state.condition = Some(condition);
                self.state.advance_stage();
                let outcome = self.draw_round_outcome();
                vec![
                    SessionEvent::ConditionSelected { condition },
                    SessionEvent::OutcomeDrawn {
                        round_index: self.state.round_index,
                        outcome,
                    },
                ]
            }

            (Stage::RoundLoop, ParticipantCommand::SubmitDecision { decision }) => {
                self.resolve_round(decision)?
            }

            (_, cmd) => {
                return Err(self.refuse(&format!("{} not accepted at this stage", cmd.name())));
            }
        };

        self.store.save_session(&self.state)?;
        self.persist_events(stage, &events)?;
        Ok(events)
    }

    /// Resolve the current round atomically: consume the pending
    /// outcome, apply the payoff rule, record, and either draw the next
    /// round or finish the session.
    fn resolve_round(&mut self, decision: Decision) -> SessionResult<Vec<SessionEvent>> {
        let outcome = self
            .state
            .pending_outcome
            .take()
            .ok_or_else(|| self.refuse("no outcome drawn for this round"))?;

        let round_index = self.state.round_index;
        let delta = compute_delta(outcome, decision, self.config.stake);
        let record = self.state.record_round(outcome, decision, delta);
        self.store.append_round(&self.state.session_id, &record)?;
        log::debug!(
            "round {round_index}: {outcome} + {decision} -> {delta:+} (endowment {})",
            self.state.endowment
        );

        let mut events = vec![SessionEvent::RoundResolved {
            round_index,
            outcome,
            decision,
            delta,
            endowment: self.state.endowment,
        }];

        if self.state.is_complete(self.config.max_rounds) {
            self.state.advance_stage();
            events.push(SessionEvent::SessionCompleted {
                final_endowment: self.state.endowment,
            });
        } else {
            let next = self.draw_round_outcome();
            events.push(SessionEvent::OutcomeDrawn {
                round_index: self.state.round_index,
                outcome: next,
            });
        }
        Ok(events)
    }

    /// The render payload for the current stage.
    pub fn stage_view(&self) -> SessionResult<StageView> {
        Ok(match self.state.stage {
            Stage::Consent => StageView::Consent {
                study_title: STUDY_TITLE,
            },
            Stage::Demographics => StageView::Demographics {
                age_min: AGE_MIN,
                age_max: AGE_MAX,
                genders: Gender::ALL.iter().map(|g| g.label()).collect(),
            },
            Stage::ConditionSelect => StageView::ConditionSelect {
                conditions: Condition::ALL.iter().map(|c| c.label()).collect(),
            },
            Stage::RoundLoop => {
                let outcome = self
                    .state
                    .pending_outcome
                    .ok_or_else(|| self.refuse("no outcome drawn for this round"))?;
                StageView::Round {
                    round_index: self.state.round_index,
                    outcome,
                    endowment: self.state.endowment,
                    decisions: Decision::ALL.iter().map(|d| d.label()).collect(),
                }
            }
            Stage::Results => StageView::Results {
                report: build_report(&self.state),
            },
        })
    }

    fn draw_round_outcome(&mut self) -> Outcome {
        let outcome = self.outcomes.draw_outcome(self.config.win_probability);
        self.state.pending_outcome = Some(outcome);
        log::debug!("round {} drew {outcome}", self.state.round_index);
        outcome
    }

    fn refuse(&self, reason: &str) -> SessionError {
        SessionError::StageRefused {
            stage:  self.state.stage,
            reason: reason.to_string(),
        }
    }

    fn persist_events(&self, stage: Stage, events: &[SessionEvent]) -> SessionResult<()> {
        for event in events {
            let entry = EventLogEntry {
                id:         None,
                session_id: self.state.session_id.clone(),
                stage:      stage.name().to_string(),
                event_type: event_type_name(event).to_string(),
                payload:    serde_json::to_string(event)?,
            };
            self.store.append_event(&entry)?;
        }
        Ok(())
    }
}

/// Extract a stable string name from a SessionEvent variant.
/// Used for the event_type column in event_log.
fn event_type_name(event: &SessionEvent) -> &'static str {
    match event {
        SessionEvent::SessionStarted { .. }   => "session_started",
        SessionEvent::ConsentRecorded         => "consent_recorded",
        SessionEvent::ProfileRecorded { .. }  => "profile_recorded",
        SessionEvent::ConditionSelected { .. }=> "condition_selected",
        SessionEvent::OutcomeDrawn { .. }     => "outcome_drawn",
        SessionEvent::RoundResolved { .. }    => "round_resolved",
        SessionEvent::SessionCompleted { .. } => "session_completed",
    }
}
