//! Application handlers.
//!
//! Command handlers that orchestrate the triage domain and its ports.

pub mod triage;

pub use triage::{
    GoBackCommand, GoBackHandler, SharedController, StartTriageCommand, StartTriageHandler,
    StartTriageResult, SubmitAnswerCommand, SubmitAnswerHandler, TriageCommandError,
    TriageRegistry, TriageStep,
};
