//! GoBackHandler - returns a live session to its previous question.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::SessionKey;
use crate::ports::TriageOutcomeSink;

use super::{settle, TriageCommandError, TriageRegistry, TriageStep};

/// Command to step back one question.
#[derive(Debug, Clone)]
pub struct GoBackCommand {
    pub session_key: SessionKey,
}

/// Handler for back navigation.
///
/// Going back from the first question publishes `TriageExited` and drops
/// the live controller. The stored snapshot is kept, so the session can be
/// resumed later.
pub struct GoBackHandler {
    registry: Arc<TriageRegistry>,
    sink: Arc<dyn TriageOutcomeSink>,
}

impl GoBackHandler {
    pub fn new(registry: Arc<TriageRegistry>, sink: Arc<dyn TriageOutcomeSink>) -> Self {
        Self { registry, sink }
    }

    pub async fn handle(&self, cmd: GoBackCommand) -> Result<TriageStep, TriageCommandError> {
        let controller = self
            .registry
            .get(&cmd.session_key)
            .await
            .ok_or_else(|| TriageCommandError::SessionNotStarted(cmd.session_key.clone()))?;

        let step = {
            let mut wizard = controller.lock().await;
            let outcome = wizard.go_back().await?;
            settle(&wizard, outcome, self.sink.as_ref()).await?
        };

        if step.is_terminal() {
            info!(session_key = %cmd.session_key, "triage session left");
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
    use crate::domain::triage::catalog::{ids, standard_graph};
    use crate::domain::triage::AnswerValue;

    fn setup() -> (GoBackHandler, Arc<TriageRegistry>, Arc<RecordingOutcomeSink>) {
        let sink = Arc::new(RecordingOutcomeSink::new());
        let registry = Arc::new(TriageRegistry::new(
            standard_graph(),
            Arc::new(InMemorySessionStore::new()),
        ));
        (
            GoBackHandler::new(registry.clone(), sink.clone()),
            registry,
            sink,
        )
    }

    #[tokio::test]
    async fn back_returns_previous_question_with_its_answer() {
        let (handler, registry, sink) = setup();
        let key = SessionKey::new("back").unwrap();
        let controller = registry.open(&key).await;
        controller.lock().await.submit_answer("hospital").await.unwrap();

        let step = handler
            .handle(GoBackCommand {
                session_key: key.clone(),
            })
            .await
            .unwrap();

        let TriageStep::Question(view) = step else {
            panic!("expected a question");
        };
        assert_eq!(view.id.as_str(), ids::LOCATION);
        assert_eq!(view.previous_answer, Some(AnswerValue::from("hospital")));
        assert_eq!(sink.exit_count(), 0);
        assert!(registry.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn back_on_first_question_exits_and_releases() {
        let (handler, registry, sink) = setup();
        let key = SessionKey::new("leave").unwrap();
        registry.open(&key).await;

        let step = handler
            .handle(GoBackCommand {
                session_key: key.clone(),
            })
            .await
            .unwrap();

        assert!(matches!(step, TriageStep::Exited(ref event) if event.session_key == key));
        assert_eq!(sink.exit_count(), 1);
        assert!(registry.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn back_without_session_is_rejected() {
        let (handler, _, _) = setup();
        let result = handler
            .handle(GoBackCommand {
                session_key: SessionKey::new("ghost").unwrap(),
            })
            .await;
        assert!(matches!(
            result,
            Err(TriageCommandError::SessionNotStarted(_))
        ));
    }
}
