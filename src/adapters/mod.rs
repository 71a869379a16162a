//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Session snapshot stores (file, in-memory)
//! - `events` - Triage outcome sinks (tracing, recording)

pub mod events;
pub mod storage;

pub use events::{RecordingOutcomeSink, TracingOutcomeSink};
pub use storage::{FileSessionStore, InMemorySessionStore};
