//! TriageRegistry - live wizard controllers keyed by session.
//!
//! Each controller sits behind its own `tokio::sync::Mutex`, whose waiters
//! are served in FIFO order, so concurrent commands for one session apply
//! one after another and different sessions never contend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::domain::foundation::SessionKey;
use crate::domain::triage::{GraphIntegrityPolicy, QuestionGraph, WizardController};
use crate::ports::SessionStore;

/// A controller shared between command handlers.
pub type SharedController = Arc<Mutex<WizardController>>;

pub struct TriageRegistry {
    graph: Arc<QuestionGraph>,
    store: Arc<dyn SessionStore>,
    policy: GraphIntegrityPolicy,
    live: RwLock<HashMap<SessionKey, SharedController>>,
}

impl TriageRegistry {
    pub fn new(graph: Arc<QuestionGraph>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            graph,
            store,
            policy: GraphIntegrityPolicy::default(),
            live: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_policy(mut self, policy: GraphIntegrityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the live controller for `key`, resuming it from the store
    /// (or starting fresh) if none is live.
    ///
    /// The store is read without holding the registry lock. If another
    /// caller opens the same key meanwhile, its controller is kept.
    pub async fn open(&self, key: &SessionKey) -> SharedController {
        if let Some(existing) = self.get(key).await {
            return existing;
        }

        let controller = WizardController::resume(
            Arc::clone(&self.graph),
            Arc::clone(&self.store),
            key.clone(),
        )
        .await
        .with_policy(self.policy);
        let resumed = controller.was_resumed();

        let mut live = self.live.write().await;
        let shared = live
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(controller)));
        debug!(session_key = %key, resumed, "opened triage session");
        Arc::clone(shared)
    }

    /// The live controller for `key`, if one is open.
    pub async fn get(&self, key: &SessionKey) -> Option<SharedController> {
        self.live.read().await.get(key).cloned()
    }

    /// Drops the live controller. Persisted state is left as it is.
    pub async fn release(&self, key: &SessionKey) {
        if self.live.write().await.remove(key).is_some() {
            debug!(session_key = %key, "released triage session");
        }
    }

    pub async fn live_count(&self) -> usize {
        self.live.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::triage::catalog::{ids, standard_graph};
    use crate::domain::triage::SessionSnapshot;
    use crate::ports::PersistenceError;
    use async_trait::async_trait;
    use std::time::Duration;

    fn registry(store: Arc<InMemorySessionStore>) -> TriageRegistry {
        TriageRegistry::new(standard_graph(), store)
    }

    #[tokio::test]
    async fn open_returns_same_controller_for_same_key() {
        let registry = registry(Arc::new(InMemorySessionStore::new()));
        let key = SessionKey::new("same").unwrap();

        let first = registry.open(&key).await;
        let second = registry.open(&key).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.live_count().await, 1);
    }

    struct SlowStore {
        inner: InMemorySessionStore,
        delay: std::time::Duration,
    }

    #[async_trait]
    impl SessionStore for SlowStore {
        async fn save(
            &self,
            key: &SessionKey,
            snapshot: &SessionSnapshot,
        ) -> Result<(), PersistenceError> {
            self.inner.save(key, snapshot).await
        }

        async fn load(&self, key: &SessionKey) -> Result<Option<SessionSnapshot>, PersistenceError> {
            tokio::time::sleep(self.delay).await;
            self.inner.load(key).await
        }

        async fn clear(&self, key: &SessionKey) -> Result<(), PersistenceError> {
            self.inner.clear(key).await
        }
    }

    #[tokio::test]
    async fn slow_load_does_not_block_other_sessions() {
        let store = Arc::new(SlowStore {
            inner: InMemorySessionStore::new(),
            delay: Duration::from_secs(5),
        });
        let registry = Arc::new(TriageRegistry::new(standard_graph(), store));
        let ready = SessionKey::new("ready").unwrap();
        let slow = SessionKey::new("slow").unwrap();

        registry.open(&ready).await;

        let pending = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.open(&slow).await })
        };
        tokio::task::yield_now().await;

        let lookup = tokio::time::timeout(Duration::from_millis(500), registry.get(&ready)).await;
        assert!(matches!(lookup, Ok(Some(_))));
        pending.abort();
    }

    #[tokio::test]
    async fn concurrent_opens_share_one_controller() {
        let registry = Arc::new(registry(Arc::new(InMemorySessionStore::new())));
        let key = SessionKey::new("shared").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                let key = key.clone();
                tokio::spawn(async move { registry.open(&key).await })
            })
            .collect();
        let mut opened = Vec::new();
        for handle in handles {
            opened.push(handle.await.unwrap());
        }

        assert!(opened.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
        assert_eq!(registry.live_count().await, 1);
    }

    #[tokio::test]
    async fn open_resumes_from_store() {
        let store = Arc::new(InMemorySessionStore::new());
        let key = SessionKey::new("resumable").unwrap();
        {
            let registry = registry(store.clone());
            let controller = registry.open(&key).await;
            controller.lock().await.submit_answer("hospital").await.unwrap();
        }

        let registry = registry(store);
        let controller = registry.open(&key).await;
        let wizard = controller.lock().await;
        assert!(wizard.was_resumed());
        assert_eq!(
            wizard.session().current_question_id().as_str(),
            ids::POSTCODE
        );
    }

    #[tokio::test]
    async fn release_keeps_persisted_state() {
        let store = Arc::new(InMemorySessionStore::new());
        let registry = registry(store.clone());
        let key = SessionKey::new("kept").unwrap();

        let controller = registry.open(&key).await;
        controller.lock().await.submit_answer("care-home").await.unwrap();
        registry.release(&key).await;

        assert!(registry.get(&key).await.is_none());
        assert!(store.load(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn registry_policy_is_applied_to_controllers() {
        let registry = registry(Arc::new(InMemorySessionStore::new()))
            .with_policy(GraphIntegrityPolicy::FallbackToComplete);
        let key = SessionKey::new("policy").unwrap();
        let controller = registry.open(&key).await;
        assert!(format!("{:?}", *controller.lock().await).contains("FallbackToComplete"));
    }
}
