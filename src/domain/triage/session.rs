//! Triage session value and its persisted snapshot.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::answers::Answers;
use super::question::QuestionId;

/// Persisted record of an in-progress session.
///
/// Layout: `{ answers, currentQuestionId, historyStack }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub answers: Answers,
    pub current_question_id: QuestionId,
    pub history_stack: Vec<QuestionId>,
}

/// Position, answers and back-navigation history of one session.
///
/// Invariant: `history_stack` never contains `current_question_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageSession {
    current_question_id: QuestionId,
    answers: Answers,
    history_stack: Vec<QuestionId>,
}

impl TriageSession {
    /// A fresh session positioned on `entry`.
    pub fn start(entry: QuestionId) -> Self {
        Self {
            current_question_id: entry,
            answers: Answers::new(),
            history_stack: Vec::new(),
        }
    }

    /// Restores a session from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the snapshot violates the history invariant.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self, ValidationError> {
        let session = Self {
            current_question_id: snapshot.current_question_id,
            answers: snapshot.answers,
            history_stack: snapshot.history_stack,
        };
        session.check_invariants()?;
        Ok(session)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            answers: self.answers.clone(),
            current_question_id: self.current_question_id.clone(),
            history_stack: self.history_stack.clone(),
        }
    }

    pub fn check_invariants(&self) -> Result<(), ValidationError> {
        if self.history_stack.contains(&self.current_question_id) {
            return Err(ValidationError::invalid_format(
                "history_stack",
                format!("contains current question '{}'", self.current_question_id),
            ));
        }
        if self.current_question_id.is_complete() || self.history_stack.iter().any(QuestionId::is_complete) {
            return Err(ValidationError::invalid_format(
                "current_question_id",
                "terminal marker is never a session position",
            ));
        }
        Ok(())
    }

    pub fn current_question_id(&self) -> &QuestionId {
        &self.current_question_id
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub(crate) fn replace_answers(&mut self, answers: Answers) {
        self.answers = answers;
    }

    /// Previously visited ids, most recent last.
    pub fn history(&self) -> &[QuestionId] {
        &self.history_stack
    }

    /// Moves forward: the current id goes onto the history stack.
    pub fn advance_to(&mut self, next: QuestionId) {
        let previous = std::mem::replace(&mut self.current_question_id, next);
        self.history_stack.push(previous);
    }

    /// Moves back to the most recently visited id. Answers are untouched.
    pub fn step_back(&mut self) -> Option<&QuestionId> {
        let previous = self.history_stack.pop()?;
        self.current_question_id = previous;
        Some(&self.current_question_id)
    }

    /// History followed by the current id.
    pub fn visited_path(&self) -> impl Iterator<Item = &QuestionId> {
        self.history_stack
            .iter()
            .chain(std::iter::once(&self.current_question_id))
    }
}
