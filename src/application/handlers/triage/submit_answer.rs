//! SubmitAnswerHandler - answers the current question of a live session.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::SessionKey;
use crate::domain::triage::AnswerValue;
use crate::ports::TriageOutcomeSink;

use super::{settle, TriageCommandError, TriageRegistry, TriageStep};

/// Command to answer the current question.
#[derive(Debug, Clone)]
pub struct SubmitAnswerCommand {
    pub session_key: SessionKey,
    /// Option value, free text, or a flag for boolean questions.
    pub value: AnswerValue,
}

/// Handler for answer submissions.
pub struct SubmitAnswerHandler {
    registry: Arc<TriageRegistry>,
    sink: Arc<dyn TriageOutcomeSink>,
}

impl SubmitAnswerHandler {
    pub fn new(registry: Arc<TriageRegistry>, sink: Arc<dyn TriageOutcomeSink>) -> Self {
        Self { registry, sink }
    }

    pub async fn handle(&self, cmd: SubmitAnswerCommand) -> Result<TriageStep, TriageCommandError> {
        let controller = self
            .registry
            .get(&cmd.session_key)
            .await
            .ok_or_else(|| TriageCommandError::SessionNotStarted(cmd.session_key.clone()))?;

        let step = {
            let mut wizard = controller.lock().await;
            let outcome = wizard.submit_answer(cmd.value).await?;
            settle(&wizard, outcome, self.sink.as_ref()).await?
        };

        if step.is_terminal() {
            info!(session_key = %cmd.session_key, "triage session finished");
            self.registry.release(&cmd.session_key).await;
        }
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::RecordingOutcomeSink;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::foundation::ValidationError;
    use crate::domain::triage::catalog::{ids, standard_graph};
    use crate::domain::triage::{Jurisdiction, WizardError};
    use crate::ports::SessionStore;

    struct Fixture {
        registry: Arc<TriageRegistry>,
        store: Arc<InMemorySessionStore>,
        sink: Arc<RecordingOutcomeSink>,
        handler: SubmitAnswerHandler,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemorySessionStore::new());
        let sink = Arc::new(RecordingOutcomeSink::new());
        let registry = Arc::new(TriageRegistry::new(standard_graph(), store.clone()));
        let handler = SubmitAnswerHandler::new(registry.clone(), sink.clone());
        Fixture {
            registry,
            store,
            sink,
            handler,
        }
    }

    fn submit(key: &SessionKey, value: &str) -> SubmitAnswerCommand {
        SubmitAnswerCommand {
            session_key: key.clone(),
            value: AnswerValue::from(value),
        }
    }

    #[tokio::test]
    async fn unknown_session_is_rejected() {
        let f = fixture();
        let key = SessionKey::new("nobody").unwrap();

        let result = f.handler.handle(submit(&key, "hospital")).await;

        assert!(matches!(
            result,
            Err(TriageCommandError::SessionNotStarted(_))
        ));
    }

    #[tokio::test]
    async fn answer_returns_next_question_view() {
        let f = fixture();
        let key = SessionKey::new("next").unwrap();
        f.registry.open(&key).await;

        let step = f.handler.handle(submit(&key, "abroad")).await.unwrap();

        let TriageStep::Question(view) = step else {
            panic!("expected a question");
        };
        assert_eq!(view.id.as_str(), ids::ABROAD_COUNTRY);
        assert!(view.can_go_back);
        assert_eq!(view.step_number, 2);
    }

    #[tokio::test]
    async fn validation_errors_pass_through() {
        let f = fixture();
        let key = SessionKey::new("invalid").unwrap();
        f.registry.open(&key).await;

        let result = f.handler.handle(submit(&key, "")).await;

        assert!(matches!(
            result,
            Err(TriageCommandError::Wizard(WizardError::Validation(
                ValidationError::InvalidFormat { .. }
            )))
        ));
    }

    #[tokio::test]
    async fn completion_publishes_once_and_releases() {
        let f = fixture();
        let key = SessionKey::new("done").unwrap();
        f.registry.open(&key).await;

        for value in ["hospital", "KY16 9AJ", "adult", "christian", "cremation", "yes"] {
            f.handler.handle(submit(&key, value)).await.unwrap();
        }
        let step = f.handler.handle(submit(&key, "no")).await.unwrap();

        let TriageStep::Completed(event) = step else {
            panic!("expected completion");
        };
        assert_eq!(event.summary.jurisdiction, Some(Jurisdiction::Scotland));
        assert_eq!(event.summary.has_will, Some(true));
        assert_eq!(event.summary.has_funeral_plan, Some(false));
        assert_eq!(f.sink.completion_count(), 1);
        assert!(f.registry.get(&key).await.is_none());
        assert!(f.store.load(&key).await.unwrap().is_none());

        let again = f.handler.handle(submit(&key, "no")).await;
        assert!(matches!(again, Err(TriageCommandError::SessionNotStarted(_))));
        assert_eq!(f.sink.completion_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_submissions_apply_in_turn() {
        let f = fixture();
        let key = SessionKey::new("racing").unwrap();
        f.registry.open(&key).await;
        let handler = Arc::new(f.handler);

        let first = {
            let handler = handler.clone();
            let key = key.clone();
            tokio::spawn(async move { handler.handle(submit(&key, "hospital")).await })
        };
        let second = {
            let handler = handler.clone();
            let key = key.clone();
            tokio::spawn(async move { handler.handle(submit(&key, "hospital")).await })
        };
        let results = [first.await.unwrap(), second.await.unwrap()];

        // Whichever runs second is answering postcode with "hospital",
        // which is valid free text; both land and history stays consistent.
        assert!(results.iter().all(Result::is_ok));
        let controller = f.registry.get(&key).await.unwrap();
        let wizard = controller.lock().await;
        assert_eq!(wizard.session().history().len(), 2);
        assert_eq!(wizard.session().current_question_id().as_str(), ids::AGE);
    }
}
