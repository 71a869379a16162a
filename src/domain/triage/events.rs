//! Outbound triage events.
//!
//! - `TriageCompleted` - the terminal question was reached; carries the answer bundle
//! - `TriageExited` - back was pressed on the first question

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionKey, Timestamp};

use super::answers::Answers;
use super::summary::TriageSummary;

/// Published exactly once per session, when the terminal marker is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageCompleted {
    pub session_key: SessionKey,
    pub answers: Answers,
    pub summary: TriageSummary,
    pub completed_at: Timestamp,
}

impl TriageCompleted {
    pub fn new(session_key: SessionKey, answers: Answers) -> Self {
        let summary = TriageSummary::from_answers(&answers);
        Self {
            session_key,
            answers,
            summary,
            completed_at: Timestamp::now(),
        }
    }
}

/// Published when the user leaves the questionnaire from its first question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageExited {
    pub session_key: SessionKey,
    pub exited_at: Timestamp,
}

impl TriageExited {
    pub fn new(session_key: SessionKey) -> Self {
        Self {
            session_key,
            exited_at: Timestamp::now(),
        }
    }
}
