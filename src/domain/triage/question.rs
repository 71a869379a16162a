//! Question nodes, options and edges of the triage graph.
//!
//! Everything here is plain data plus pure function pointers. Edges are
//! tagged: a static edge names its target, a dynamic edge declares every
//! target it may return and computes the choice from the full answer set.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use super::answers::Answers;

/// Reserved id of the terminal marker.
pub const TERMINAL_ID: &str = "complete";

/// Identity of a question node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The terminal marker. Never names a defined question.
    pub fn complete() -> Self {
        Self(TERMINAL_ID.to_string())
    }

    pub fn is_complete(&self) -> bool {
        self.0 == TERMINAL_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for QuestionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computes a target from the complete answer set.
pub type Resolver = fn(&Answers) -> QuestionId;

/// Decides whether a question should ever be shown.
pub type Predicate = fn(&Answers) -> bool;

/// Input style of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick one of the listed options.
    SingleChoice,
    /// Non-empty free text.
    FreeText,
    /// Yes/no confirmation stored as a boolean.
    Boolean,
}

/// A graph edge.
#[derive(Clone)]
pub enum Edge {
    Static(QuestionId),
    Dynamic {
        /// Every id `resolve` may return.
        targets: Vec<QuestionId>,
        resolve: Resolver,
    },
}

impl Edge {
    /// Static edge to `target`.
    pub fn to(target: impl Into<QuestionId>) -> Self {
        Edge::Static(target.into())
    }

    /// Dynamic edge choosing among the declared `targets`.
    pub fn dynamic<I, T>(targets: I, resolve: Resolver) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<QuestionId>,
    {
        Edge::Dynamic {
            targets: targets.into_iter().map(Into::into).collect(),
            resolve,
        }
    }

    /// Every id this edge can lead to.
    pub fn targets(&self) -> &[QuestionId] {
        match self {
            Edge::Static(target) => std::slice::from_ref(target),
            Edge::Dynamic { targets, .. } => targets,
        }
    }

    /// Follows the edge. Dynamic edges see the full answer set.
    pub fn evaluate(&self, answers: &Answers) -> QuestionId {
        match self {
            Edge::Static(target) => target.clone(),
            Edge::Dynamic { resolve, .. } => resolve(answers),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Edge::Dynamic { .. })
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Static(target) => f.debug_tuple("Static").field(target).finish(),
            Edge::Dynamic { targets, .. } => f
                .debug_struct("Dynamic")
                .field("targets", targets)
                .finish_non_exhaustive(),
        }
    }
}

/// One selectable answer of a single-choice question.
#[derive(Debug, Clone)]
pub struct AnswerOption {
    pub value: String,
    pub label: String,
    /// Overrides the question's default edge when present.
    pub next: Option<Edge>,
}

/// A question node.
#[derive(Clone)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub description: Option<String>,
    pub kind: QuestionKind,
    pub options: Vec<AnswerOption>,
    pub placeholder: Option<String>,
    pub visible_if: Option<Predicate>,
    pub default_next: Option<Edge>,
    /// Quick-prompt chips offered to an external assistant.
    pub assistant_prompts: Vec<String>,
}

impl Question {
    fn blank(id: impl Into<QuestionId>, prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            description: None,
            kind,
            options: Vec::new(),
            placeholder: None,
            visible_if: None,
            default_next: None,
            assistant_prompts: Vec::new(),
        }
    }

    pub fn single_choice(id: impl Into<QuestionId>, prompt: impl Into<String>) -> Self {
        Self::blank(id, prompt, QuestionKind::SingleChoice)
    }

    pub fn free_text(id: impl Into<QuestionId>, prompt: impl Into<String>) -> Self {
        Self::blank(id, prompt, QuestionKind::FreeText)
    }

    pub fn boolean(id: impl Into<QuestionId>, prompt: impl Into<String>) -> Self {
        Self::blank(id, prompt, QuestionKind::Boolean)
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Adds an option that falls through to the default edge.
    pub fn choice(self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.push_option(value.into(), label.into(), None)
    }

    /// Adds an option with its own static edge.
    pub fn choice_to(
        self,
        value: impl Into<String>,
        label: impl Into<String>,
        next: impl Into<QuestionId>,
    ) -> Self {
        self.push_option(value.into(), label.into(), Some(Edge::to(next)))
    }

    /// Adds an option with an arbitrary edge.
    pub fn choice_via(self, value: impl Into<String>, label: impl Into<String>, next: Edge) -> Self {
        self.push_option(value.into(), label.into(), Some(next))
    }

    fn push_option(mut self, value: String, label: String, next: Option<Edge>) -> Self {
        self.options.push(AnswerOption { value, label, next });
        self
    }

    pub fn visible_if(mut self, predicate: Predicate) -> Self {
        self.visible_if = Some(predicate);
        self
    }

    pub fn default_next(mut self, next: impl Into<QuestionId>) -> Self {
        self.default_next = Some(Edge::to(next));
        self
    }

    pub fn default_via(mut self, next: Edge) -> Self {
        self.default_next = Some(next);
        self
    }

    pub fn assistant_prompts<I, S>(mut self, prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assistant_prompts = prompts.into_iter().map(Into::into).collect();
        self
    }

    /// Finds the option with the given value.
    pub fn find_option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }

    /// Evaluates the visibility predicate. Questions without one are always visible.
    pub fn is_visible(&self, answers: &Answers) -> bool {
        self.visible_if.map_or(true, |predicate| predicate(answers))
    }

    /// All outgoing edges: option edges first, then the default edge.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.options
            .iter()
            .filter_map(|option| option.next.as_ref())
            .chain(self.default_next.iter())
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("conditional", &self.visible_if.is_some())
            .field("default_next", &self.default_next)
            .finish_non_exhaustive()
    }
}
