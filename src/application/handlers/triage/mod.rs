//! Triage command handlers.
//!
//! - `StartTriageHandler` - resume or create a session and show its question
//! - `SubmitAnswerHandler` - answer the current question
//! - `GoBackHandler` - return to the previous question, or exit
//!
//! Completion and exit are published through the `TriageOutcomeSink` and
//! release the live controller.

mod go_back;
mod registry;
mod start_triage;
mod submit_answer;

pub use go_back::{GoBackCommand, GoBackHandler};
pub use registry::{SharedController, TriageRegistry};
pub use start_triage::{StartTriageCommand, StartTriageHandler, StartTriageResult};
pub use submit_answer::{SubmitAnswerCommand, SubmitAnswerHandler};

use thiserror::Error;

use crate::domain::foundation::SessionKey;
use crate::domain::triage::{
    QuestionView, TriageCompleted, TriageExited, WizardController, WizardError, WizardOutcome,
};
use crate::ports::TriageOutcomeSink;

/// What the host should show after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum TriageStep {
    /// Render this question next.
    Question(QuestionView),
    /// The triage finished; hand the bundle to guidance generation.
    Completed(TriageCompleted),
    /// The user left from the first question.
    Exited(TriageExited),
}

/// Errors shared by the triage command handlers.
#[derive(Debug, Error)]
pub enum TriageCommandError {
    #[error("No triage session is open for key {0}")]
    SessionNotStarted(SessionKey),

    #[error(transparent)]
    Wizard(#[from] WizardError),
}

// Turns a wizard outcome into a step, publishing terminal outcomes.
// The caller releases the controller when the step is terminal.
async fn settle(
    wizard: &WizardController,
    outcome: WizardOutcome,
    sink: &dyn TriageOutcomeSink,
) -> Result<TriageStep, TriageCommandError> {
    let key = wizard.session_key().clone();
    match outcome {
        WizardOutcome::Advanced(_) | WizardOutcome::Returned(_) => wizard
            .view()
            .map(TriageStep::Question)
            .ok_or(TriageCommandError::Wizard(WizardError::AlreadyComplete)),
        WizardOutcome::Completed(answers) => {
            let event = TriageCompleted::new(key, answers);
            sink.on_complete(event.clone()).await;
            Ok(TriageStep::Completed(event))
        }
        WizardOutcome::Exited => {
            let event = TriageExited::new(key);
            sink.on_exit(event.clone()).await;
            Ok(TriageStep::Exited(event))
        }
    }
}

impl TriageStep {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TriageStep::Question(_))
    }
}
