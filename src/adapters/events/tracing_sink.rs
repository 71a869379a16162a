//! Outcome sink that writes structured log records.

use async_trait::async_trait;
use tracing::info;

use crate::domain::triage::{TriageCompleted, TriageExited};
use crate::ports::TriageOutcomeSink;

/// Logs each outcome at `info` level. The default sink for headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOutcomeSink;

#[async_trait]
impl TriageOutcomeSink for TracingOutcomeSink {
    async fn on_complete(&self, event: TriageCompleted) {
        let summary = &event.summary;
        info!(
            session_key = %event.session_key,
            answers = event.answers.len(),
            jurisdiction = ?summary.jurisdiction,
            death_location = ?summary.death_location,
            urgent_burial_help = summary.needs_urgent_burial_help,
            completed_at = %event.completed_at.as_datetime(),
            "triage completed"
        );
    }

    async fn on_exit(&self, event: TriageExited) {
        info!(
            session_key = %event.session_key,
            exited_at = %event.exited_at.as_datetime(),
            "triage exited from first question"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionKey;
    use crate::domain::triage::Answers;

    #[tokio::test]
    async fn accepts_both_outcomes() {
        let sink = TracingOutcomeSink;
        let key = SessionKey::new("logged").unwrap();
        sink.on_complete(TriageCompleted::new(key.clone(), Answers::new()))
            .await;
        sink.on_exit(TriageExited::new(key)).await;
    }
}
