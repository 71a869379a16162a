//! Domain layer containing the triage state machine and its value types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (session keys, timestamps, errors)
//! - `triage` - Question graph, answers, sessions and the wizard controller

pub mod foundation;
pub mod triage;
