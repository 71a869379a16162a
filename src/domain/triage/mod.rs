//! Triage domain - the bereavement questionnaire as a state machine.
//!
//! # Module Organization
//!
//! - `question` - Question, option and edge definitions
//! - `answers` - Answer map with derived fields
//! - `graph` - Validated, immutable question graph
//! - `catalog` - The standard questionnaire
//! - `jurisdiction` - Postcode to UK jurisdiction resolution
//! - `session` - Position, answers and history, plus the persisted snapshot
//! - `wizard` - The controller driving transitions
//! - `view` - Render model for the current question
//! - `summary` - Typed digest of a completed answer bundle
//! - `events` - Completion and exit notifications

mod answers;
pub mod catalog;
mod events;
mod graph;
mod jurisdiction;
mod question;
mod session;
mod summary;
mod view;
mod wizard;

pub use answers::{AnswerValue, Answers, DerivedField};
pub use events::{TriageCompleted, TriageExited};
pub use graph::{GraphIntegrityError, QuestionGraph};
pub use jurisdiction::{resolve_jurisdiction, Jurisdiction};
pub use question::{
    AnswerOption, Edge, Predicate, Question, QuestionId, QuestionKind, Resolver, TERMINAL_ID,
};
pub use session::{SessionSnapshot, TriageSession};
pub use summary::{
    AgeCategory, BurialPreference, DeathLocation, Nationality, Religion, TriageSummary,
};
pub use view::{OptionView, QuestionView};
pub use wizard::{
    GraphIntegrityPolicy, WizardController, WizardError, WizardOutcome, WizardState,
};
