//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionStore` - save/load/clear of in-progress triage sessions
//! - `TriageOutcomeSink` - completion and exit notifications for the host

mod session_store;
mod triage_outcome_sink;

pub use session_store::{PersistenceError, SessionStore};
pub use triage_outcome_sink::TriageOutcomeSink;
