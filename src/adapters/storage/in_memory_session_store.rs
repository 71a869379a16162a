//! In-Memory Session Store Adapter
//!
//! Keeps one snapshot per session key in memory.
//! Useful for testing and for hosts that do not need resumption across restarts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionKey;
use crate::domain::triage::SessionSnapshot;
use crate::ports::{PersistenceError, SessionStore};

/// In-memory storage for triage session snapshots
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    snapshots: Arc<RwLock<HashMap<SessionKey, SessionSnapshot>>>,
}

impl InMemorySessionStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            snapshots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Remove every stored snapshot (useful for tests)
    pub async fn clear_all(&self) {
        self.snapshots.write().await.clear();
    }

    /// Get the number of stored snapshots
    pub async fn session_count(&self) -> usize {
        self.snapshots.read().await.len()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(
        &self,
        key: &SessionKey,
        snapshot: &SessionSnapshot,
    ) -> Result<(), PersistenceError> {
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(key.clone(), snapshot.clone());
        Ok(())
    }

    async fn load(&self, key: &SessionKey) -> Result<Option<SessionSnapshot>, PersistenceError> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.get(key).cloned())
    }

    async fn clear(&self, key: &SessionKey) -> Result<(), PersistenceError> {
        self.snapshots.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::{Answers, QuestionId};

    fn key(name: &str) -> SessionKey {
        SessionKey::new(name).unwrap()
    }

    fn snapshot_at(current: &str, history: &[&str]) -> SessionSnapshot {
        SessionSnapshot {
            answers: Answers::new(),
            current_question_id: QuestionId::new(current),
            history_stack: history.iter().map(|id| QuestionId::new(*id)).collect(),
        }
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let store = InMemorySessionStore::new();
        let snapshot = snapshot_at("postcode", &["location"]);

        store.save(&key("a"), &snapshot).await.unwrap();

        assert_eq!(store.load(&key("a")).await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn load_missing_key_returns_none() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.load(&key("missing")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_replaces_previous_snapshot() {
        let store = InMemorySessionStore::new();
        store
            .save(&key("a"), &snapshot_at("postcode", &["location"]))
            .await
            .unwrap();
        store
            .save(&key("a"), &snapshot_at("age", &["location", "postcode"]))
            .await
            .unwrap();

        let loaded = store.load(&key("a")).await.unwrap().unwrap();
        assert_eq!(loaded.current_question_id.as_str(), "age");
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn clear_removes_only_that_key() {
        let store = InMemorySessionStore::new();
        store.save(&key("a"), &snapshot_at("location", &[])).await.unwrap();
        store.save(&key("b"), &snapshot_at("location", &[])).await.unwrap();

        store.clear(&key("a")).await.unwrap();
        store.clear(&key("never-saved")).await.unwrap();

        assert_eq!(store.load(&key("a")).await.unwrap(), None);
        assert!(store.load(&key("b")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn clear_all_empties_the_store() {
        let store = InMemorySessionStore::new();
        store.save(&key("a"), &snapshot_at("location", &[])).await.unwrap();
        store.save(&key("b"), &snapshot_at("location", &[])).await.unwrap();
        assert_eq!(store.session_count().await, 2);

        store.clear_all().await;
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn clones_share_storage_across_tasks() {
        let store = InMemorySessionStore::new();
        let writer = store.clone();

        tokio::spawn(async move {
            writer
                .save(&key("shared"), &snapshot_at("location", &[]))
                .await
                .unwrap();
        })
        .await
        .unwrap();

        assert!(store.load(&key("shared")).await.unwrap().is_some());
    }
}
