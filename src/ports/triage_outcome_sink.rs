//! Triage outcome port (outbound).
//!
//! Receives the two ways a triage ends: completion with the full answer
//! bundle (for guidance generation) and exit from the first question.

use async_trait::async_trait;

use crate::domain::triage::{TriageCompleted, TriageExited};

/// Port for delivering triage outcomes to the host application.
///
/// Delivery is fire-and-forget from the engine's point of view; an
/// implementation that can fail should log and swallow its own errors.
#[async_trait]
pub trait TriageOutcomeSink: Send + Sync {
    /// Called exactly once per session, when the terminal marker is reached.
    async fn on_complete(&self, event: TriageCompleted);

    /// Called when back is pressed with an empty history.
    async fn on_exit(&self, event: TriageExited);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_outcome_sink_is_object_safe() {
        fn _accepts_dyn(_sink: &dyn TriageOutcomeSink) {}
    }
}
