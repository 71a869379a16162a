//! Outcome sink adapters.
//!
//! - `RecordingOutcomeSink` - Captures outcomes in memory for assertions
//! - `TracingOutcomeSink` - Emits outcomes as structured log records

mod in_memory;
mod tracing_sink;

pub use in_memory::RecordingOutcomeSink;
pub use tracing_sink::TracingOutcomeSink;
