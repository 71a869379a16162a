//! Storage Adapters
//!
//! Implementations of the SessionStore port for persisting triage sessions.
//!
//! ## Available Adapters
//!
//! - **FileSessionStore** - One JSON file per session key
//! - **InMemorySessionStore** - Stores snapshots in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSessionStore, InMemorySessionStore};
//!
//! // Resumable across restarts
//! let store = FileSessionStore::new("./data/sessions");
//!
//! // Testing
//! let store = InMemorySessionStore::new();
//! ```

mod file_session_store;
mod in_memory_session_store;

pub use file_session_store::FileSessionStore;
pub use in_memory_session_store::InMemorySessionStore;
