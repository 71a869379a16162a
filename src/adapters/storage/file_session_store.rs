//! File-based Session Store Adapter
//!
//! Stores each session snapshot as a JSON file named after its key.
//! Characters outside `[A-Za-z0-9_-]` are replaced in file names, so keys
//! that differ only in such characters share a file.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::SessionKey;
use crate::domain::triage::SessionSnapshot;
use crate::ports::{PersistenceError, SessionStore};

/// File-based storage for triage session snapshots
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// The directory is created on first save.
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSessionStore::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the snapshot file path for a key
    fn snapshot_path(&self, key: &SessionKey) -> PathBuf {
        let name: String = key
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.json", name))
    }

    /// Ensure the base directory exists
    async fn ensure_dir(&self) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| PersistenceError::Io(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(
        &self,
        key: &SessionKey,
        snapshot: &SessionSnapshot,
    ) -> Result<(), PersistenceError> {
        self.ensure_dir().await?;

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| PersistenceError::SerializationFailed(e.to_string()))?;

        // Write beside the target, then rename, so a crash never leaves half a file
        let path = self.snapshot_path(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json)
            .await
            .map_err(|e| PersistenceError::Io(e.to_string()))?;
        fs::rename(&staging, &path)
            .await
            .map_err(|e| PersistenceError::Io(e.to_string()))?;

        Ok(())
    }

    async fn load(&self, key: &SessionKey) -> Result<Option<SessionSnapshot>, PersistenceError> {
        let json = match fs::read_to_string(self.snapshot_path(key)).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PersistenceError::Io(e.to_string())),
        };

        let snapshot = serde_json::from_str(&json)
            .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;

        Ok(Some(snapshot))
    }

    async fn clear(&self, key: &SessionKey) -> Result<(), PersistenceError> {
        match fs::remove_file(self.snapshot_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::{AnswerValue, Answers, QuestionId};
    use tempfile::TempDir;

    fn key(name: &str) -> SessionKey {
        SessionKey::new(name).unwrap()
    }

    fn test_snapshot() -> SessionSnapshot {
        let mut answers = Answers::new();
        answers
            .record(&QuestionId::new("location"), AnswerValue::from("hospital"))
            .unwrap();
        answers
            .record(&QuestionId::new("postcode"), AnswerValue::from("G1 1AA"))
            .unwrap();
        answers.refresh_derived();
        SessionSnapshot {
            answers,
            current_question_id: QuestionId::new("age"),
            history_stack: vec![QuestionId::new("location"), QuestionId::new("postcode")],
        }
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        store.save(&key("triage-1"), &test_snapshot()).await.unwrap();

        let loaded = store.load(&key("triage-1")).await.unwrap();
        assert_eq!(loaded, Some(test_snapshot()));
    }

    #[tokio::test]
    async fn load_missing_key_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        assert_eq!(store.load(&key("missing")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn creates_base_directory_on_first_save() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("data").join("sessions");
        let store = FileSessionStore::new(&nested);

        store.save(&key("a"), &test_snapshot()).await.unwrap();

        assert!(nested.join("a.json").exists());
        assert!(!nested.join("a.json.tmp").exists());
    }

    #[tokio::test]
    async fn file_uses_flat_camel_case_layout() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());
        store.save(&key("layout"), &test_snapshot()).await.unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join("layout.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["currentQuestionId"], "age");
        assert_eq!(json["historyStack"], serde_json::json!(["location", "postcode"]));
        assert_eq!(json["answers"]["jurisdiction"], "scotland");
    }

    #[tokio::test]
    async fn corrupt_file_is_a_deserialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("broken.json"), "{not json").unwrap();

        let result = store.load(&key("broken")).await;
        assert!(matches!(
            result,
            Err(PersistenceError::DeserializationFailed(_))
        ));
    }

    #[tokio::test]
    async fn clear_removes_file_and_tolerates_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());
        store.save(&key("a"), &test_snapshot()).await.unwrap();

        store.clear(&key("a")).await.unwrap();
        store.clear(&key("a")).await.unwrap();

        assert_eq!(store.load(&key("a")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_are_sanitized_into_file_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        store.save(&key("../escape/attempt"), &test_snapshot()).await.unwrap();

        assert!(!temp_dir.path().join("escape").exists());
        assert!(temp_dir.path().join("___escape_attempt.json").exists());
        assert!(store.load(&key("../escape/attempt")).await.unwrap().is_some());
    }
}
