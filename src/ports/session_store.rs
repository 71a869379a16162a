//! Session Store Port - Interface for persisting triage sessions.
//!
//! Saves are best-effort: the wizard logs a `PersistenceError` and keeps
//! going in memory, so a failing store only costs resumability.

use async_trait::async_trait;

use crate::domain::foundation::SessionKey;
use crate::domain::triage::SessionSnapshot;

/// Errors that can occur during session storage operations
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Port for saving, loading and clearing one snapshot per session key
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Save the snapshot, replacing any previous one under `key`
    ///
    /// # Errors
    /// Returns `PersistenceError` if the write fails
    async fn save(&self, key: &SessionKey, snapshot: &SessionSnapshot)
        -> Result<(), PersistenceError>;

    /// Load the snapshot stored under `key`
    ///
    /// # Returns
    /// `None` if nothing is stored
    async fn load(&self, key: &SessionKey) -> Result<Option<SessionSnapshot>, PersistenceError>;

    /// Remove the snapshot stored under `key`. Clearing a missing key succeeds.
    async fn clear(&self, key: &SessionKey) -> Result<(), PersistenceError>;
}
