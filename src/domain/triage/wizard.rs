//! WizardController - the triage state machine.
//!
//! Holds the current position, the accumulated answers and the
//! back-navigation history of exactly one session. Every transition is
//! computed on a copy of the answers and committed only once it is known
//! to succeed, so a rejected submission leaves no trace.
//!
//! # Transitions
//!
//! - `submit_answer` validates, records, re-derives, resolves the next id
//!   and skips forward past hidden questions. Reaching the terminal marker
//!   completes the session and clears persistence; otherwise the new
//!   position is saved.
//! - `go_back` pops the history stack without re-running visibility, or
//!   reports `Exited` when there is nowhere to go.
//!
//! Both take `&mut self`: a second transition cannot start while the
//! previous one (including its persistence write) is still running.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::foundation::{SessionKey, ValidationError};
use crate::ports::SessionStore;

use super::answers::{AnswerValue, Answers, DerivedField};
use super::graph::{GraphIntegrityError, QuestionGraph};
use super::question::{Question, QuestionId, QuestionKind};
use super::session::TriageSession;
use super::view::QuestionView;

/// What to do when the graph turns out to be inconsistent at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphIntegrityPolicy {
    /// Surface the fault as an error and leave the session untouched.
    Strict,
    /// Log the fault and complete the triage with what was collected.
    FallbackToComplete,
}

impl Default for GraphIntegrityPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            GraphIntegrityPolicy::Strict
        } else {
            GraphIntegrityPolicy::FallbackToComplete
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    At(QuestionId),
    Complete,
}

/// Result of a transition, for the caller to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    /// Moved forward to a visible question.
    Advanced(QuestionId),
    /// Moved back to a previously visited question.
    Returned(QuestionId),
    /// Terminal reached; the final answer bundle.
    Completed(Answers),
    /// Back pressed on the first question.
    Exited,
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Question graph integrity fault: {0}")]
    GraphIntegrity(#[from] GraphIntegrityError),

    #[error("Triage is already complete")]
    AlreadyComplete,
}

pub struct WizardController {
    graph: Arc<QuestionGraph>,
    store: Arc<dyn SessionStore>,
    key: SessionKey,
    policy: GraphIntegrityPolicy,
    session: TriageSession,
    state: WizardState,
    resumed: bool,
}

impl WizardController {
    /// Starts a fresh session on the graph's entry question.
    pub fn new(graph: Arc<QuestionGraph>, store: Arc<dyn SessionStore>, key: SessionKey) -> Self {
        let session = TriageSession::start(graph.entry().clone());
        let state = WizardState::At(graph.entry().clone());
        Self {
            graph,
            store,
            key,
            policy: GraphIntegrityPolicy::default(),
            session,
            state,
            resumed: false,
        }
    }

    /// Restores the session stored under `key`, or starts fresh.
    ///
    /// A snapshot that cannot be read, breaks the history invariant, or
    /// names questions the graph no longer defines is discarded with a
    /// warning. Derived fields are recomputed from the restored answers.
    pub async fn resume(
        graph: Arc<QuestionGraph>,
        store: Arc<dyn SessionStore>,
        key: SessionKey,
    ) -> Self {
        let loaded = match store.load(&key).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(session_key = %key, error = %err, "failed to load triage session; starting fresh");
                None
            }
        };

        let mut controller = Self::new(graph, store, key);
        let Some(snapshot) = loaded else {
            return controller;
        };

        match controller.restore(snapshot) {
            Ok(()) => {
                info!(
                    session_key = %controller.key,
                    question = %controller.session.current_question_id(),
                    "resumed triage session"
                );
            }
            Err(err) => {
                warn!(session_key = %controller.key, error = %err, "discarding unusable triage snapshot");
            }
        }
        controller
    }

    fn restore(&mut self, snapshot: super::session::SessionSnapshot) -> Result<(), WizardError> {
        let mut session = TriageSession::from_snapshot(snapshot)?;
        for id in session.visited_path() {
            self.graph.get(id.as_str())?;
        }
        let mut answers = session.answers().clone();
        answers.refresh_derived();
        session.replace_answers(answers);

        self.state = WizardState::At(session.current_question_id().clone());
        self.session = session;
        self.resumed = true;
        Ok(())
    }

    pub fn with_policy(mut self, policy: GraphIntegrityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == WizardState::Complete
    }

    pub fn session(&self) -> &TriageSession {
        &self.session
    }

    pub fn answers(&self) -> &Answers {
        self.session.answers()
    }

    pub fn session_key(&self) -> &SessionKey {
        &self.key
    }

    /// True if this controller was restored from a stored snapshot.
    pub fn was_resumed(&self) -> bool {
        self.resumed
    }

    /// The question the UI should show, if the triage is still running.
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            WizardState::At(id) => self.graph.get(id.as_str()).ok(),
            WizardState::Complete => None,
        }
    }

    pub fn view(&self) -> Option<QuestionView> {
        self.current_question()
            .map(|question| QuestionView::build(question, &self.session))
    }

    /// Routes an option click.
    pub async fn select_option(&mut self, value: &str) -> Result<WizardOutcome, WizardError> {
        self.submit_answer(AnswerValue::from(value)).await
    }

    /// Routes a free-text submission.
    pub async fn submit_text(&mut self, value: &str) -> Result<WizardOutcome, WizardError> {
        self.submit_answer(AnswerValue::from(value)).await
    }

    /// Answers the current question and moves forward.
    ///
    /// # Errors
    ///
    /// - `Validation` if the value does not fit the question; nothing changes
    /// - `AlreadyComplete` once the terminal marker has been reached
    /// - `GraphIntegrity` under the strict policy if resolution fails
    pub async fn submit_answer(
        &mut self,
        value: impl Into<AnswerValue>,
    ) -> Result<WizardOutcome, WizardError> {
        let current = match &self.state {
            WizardState::At(id) => id.clone(),
            WizardState::Complete => return Err(WizardError::AlreadyComplete),
        };
        let question = self.graph.get(current.as_str())?;
        let value = accept(question, value.into())?;

        let mut answers = self.session.answers().clone();
        answers.record(&current, value.clone())?;
        if DerivedField::is_source(current.as_str()) {
            answers.refresh_derived();
        }

        let next = match self.next_visible(&current, &value, &answers) {
            Ok(next) => next,
            Err(err) => self.integrity_fault(&current, err)?,
        };

        self.session.replace_answers(answers);
        if next.is_complete() {
            return Ok(self.finish().await);
        }

        debug!(session_key = %self.key, from = %current, to = %next, "triage advanced");
        self.session.advance_to(next.clone());
        self.state = WizardState::At(next.clone());
        self.persist().await;
        Ok(WizardOutcome::Advanced(next))
    }

    /// Returns to the previously visited question.
    ///
    /// The earlier answer stays recorded and is offered for re-editing.
    /// Visibility is not re-evaluated on the way back.
    pub async fn go_back(&mut self) -> Result<WizardOutcome, WizardError> {
        if self.is_complete() {
            return Err(WizardError::AlreadyComplete);
        }
        let Some(previous) = self.session.step_back().cloned() else {
            debug!(session_key = %self.key, "back pressed on first question");
            return Ok(WizardOutcome::Exited);
        };

        debug!(session_key = %self.key, to = %previous, "triage stepped back");
        self.state = WizardState::At(previous.clone());
        self.persist().await;
        Ok(WizardOutcome::Returned(previous))
    }

    // Resolves, then keeps following default edges while the candidate is hidden.
    // Terminates because the graph is acyclic.
    fn next_visible(
        &self,
        current: &QuestionId,
        value: &AnswerValue,
        answers: &Answers,
    ) -> Result<QuestionId, GraphIntegrityError> {
        let mut candidate = self.graph.resolve(current.as_str(), value, answers)?;
        while !candidate.is_complete() && !self.graph.is_visible(candidate.as_str(), answers)? {
            debug!(session_key = %self.key, skipped = %candidate, "skipping hidden question");
            candidate = self.graph.resolve_default(candidate.as_str(), answers)?;
        }
        Ok(candidate)
    }

    fn integrity_fault(
        &self,
        at: &QuestionId,
        err: GraphIntegrityError,
    ) -> Result<QuestionId, WizardError> {
        error!(
            session_key = %self.key,
            question = %at,
            error = %err,
            policy = ?self.policy,
            "question graph integrity fault"
        );
        match self.policy {
            GraphIntegrityPolicy::Strict => Err(err.into()),
            GraphIntegrityPolicy::FallbackToComplete => Ok(QuestionId::complete()),
        }
    }

    async fn finish(&mut self) -> WizardOutcome {
        let path: HashSet<QuestionId> = self.session.visited_path().cloned().collect();
        let mut bundle = self.session.answers().clone();
        bundle.retain_questions(&path);
        bundle.refresh_derived();

        self.state = WizardState::Complete;
        if let Err(err) = self.store.clear(&self.key).await {
            warn!(session_key = %self.key, error = %err, "failed to clear completed triage session");
        }
        info!(session_key = %self.key, answers = bundle.len(), "triage complete");
        WizardOutcome::Completed(bundle)
    }

    async fn persist(&self) {
        let snapshot = self.session.snapshot();
        if let Err(err) = self.store.save(&self.key, &snapshot).await {
            warn!(
                session_key = %self.key,
                error = %err,
                "failed to persist triage session; continuing in memory"
            );
        }
    }
}

impl fmt::Debug for WizardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("key", &self.key)
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Checks a submission against the question kind. Free text is trimmed.
fn accept(question: &Question, value: AnswerValue) -> Result<AnswerValue, ValidationError> {
    let field = question.id.as_str();
    match (question.kind, value) {
        (QuestionKind::SingleChoice, AnswerValue::Text(selected)) => {
            if question.find_option(&selected).is_some() {
                Ok(AnswerValue::Text(selected))
            } else {
                Err(ValidationError::invalid_format(
                    field,
                    format!("unknown option '{}'", selected),
                ))
            }
        }
        (QuestionKind::FreeText, AnswerValue::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(ValidationError::empty_field(field))
            } else {
                Ok(AnswerValue::Text(trimmed.to_string()))
            }
        }
        (QuestionKind::Boolean, AnswerValue::Flag(flag)) => Ok(AnswerValue::Flag(flag)),
        (QuestionKind::SingleChoice, AnswerValue::Flag(_)) => Err(ValidationError::invalid_format(
            field,
            "expected one of the listed options",
        )),
        (QuestionKind::FreeText, AnswerValue::Flag(_)) => {
            Err(ValidationError::invalid_format(field, "expected text"))
        }
        (QuestionKind::Boolean, AnswerValue::Text(_)) => {
            Err(ValidationError::invalid_format(field, "expected yes or no"))
        }
    }
}
