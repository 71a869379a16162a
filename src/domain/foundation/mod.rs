//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the triage domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::SessionKey;
pub use timestamp::Timestamp;
