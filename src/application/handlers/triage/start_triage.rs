//! StartTriageHandler - opens a triage session and returns its current question.

use std::sync::Arc;

use crate::domain::foundation::SessionKey;
use crate::domain::triage::{QuestionView, WizardError};

use super::{TriageCommandError, TriageRegistry};

/// Command to start or resume a triage.
#[derive(Debug, Clone, Default)]
pub struct StartTriageCommand {
    /// Resume this session if stored; `None` starts under a fresh key.
    pub session_key: Option<SessionKey>,
}

/// Result of opening a session.
#[derive(Debug, Clone)]
pub struct StartTriageResult {
    pub session_key: SessionKey,
    /// The question to render.
    pub question: QuestionView,
    /// True if a stored session was picked up.
    pub resumed: bool,
}

/// Handler for starting triage sessions.
pub struct StartTriageHandler {
    registry: Arc<TriageRegistry>,
}

impl StartTriageHandler {
    pub fn new(registry: Arc<TriageRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(
        &self,
        cmd: StartTriageCommand,
    ) -> Result<StartTriageResult, TriageCommandError> {
        let session_key = cmd.session_key.unwrap_or_else(SessionKey::generate);
        let controller = self.registry.open(&session_key).await;
        let wizard = controller.lock().await;

        let question = wizard.view().ok_or(WizardError::AlreadyComplete)?;
        Ok(StartTriageResult {
            session_key,
            question,
            resumed: wizard.was_resumed(),
        })
    }
}
