//! In-memory outcome sink for testing.
//!
//! Captures every completion and exit so tests can assert on them.
//!
//! # Security Note
//!
//! This adapter is for **testing only**. It uses `.expect()` on lock
//! operations which will panic if locks are poisoned.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::triage::{TriageCompleted, TriageExited};
use crate::ports::TriageOutcomeSink;

/// Outcome sink that records what it receives.
///
/// # Example
///
/// ```ignore
/// let sink = Arc::new(RecordingOutcomeSink::new());
/// // ... drive a triage through the handlers ...
/// assert_eq!(sink.completion_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingOutcomeSink {
    completed: RwLock<Vec<TriageCompleted>>,
    exited: RwLock<Vec<TriageExited>>,
}

impl RecordingOutcomeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all completions received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn completions(&self) -> Vec<TriageCompleted> {
        self.completed
            .read()
            .expect("RecordingOutcomeSink: completed lock poisoned")
            .clone()
    }

    /// Returns all exits received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn exits(&self) -> Vec<TriageExited> {
        self.exited
            .read()
            .expect("RecordingOutcomeSink: exited lock poisoned")
            .clone()
    }

    pub fn completion_count(&self) -> usize {
        self.completions().len()
    }

    pub fn exit_count(&self) -> usize {
        self.exits().len()
    }
}

#[async_trait]
impl TriageOutcomeSink for RecordingOutcomeSink {
    async fn on_complete(&self, event: TriageCompleted) {
        self.completed
            .write()
            .expect("RecordingOutcomeSink: completed write lock poisoned")
            .push(event);
    }

    async fn on_exit(&self, event: TriageExited) {
        self.exited
            .write()
            .expect("RecordingOutcomeSink: exited write lock poisoned")
            .push(event);
    }
}
