//! Accumulated answers of one triage session.
//!
//! User-supplied answers and derived fields live in separate maps so a
//! derived value can never be written through a question submission.
//! Both are flattened into one `string -> string|boolean` map on the wire.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::domain::foundation::ValidationError;

use super::catalog::ids;
use super::jurisdiction::{resolve_jurisdiction, Jurisdiction};
use super::question::QuestionId;

/// A single answer: free text / option value, or a boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Text(String),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            AnswerValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            AnswerValue::Flag(flag) => Some(*flag),
            AnswerValue::Text(_) => None,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(text: &str) -> Self {
        AnswerValue::Text(text.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(text: String) -> Self {
        AnswerValue::Text(text)
    }
}

impl From<bool> for AnswerValue {
    fn from(flag: bool) -> Self {
        AnswerValue::Flag(flag)
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Text(text) => write!(f, "{}", text),
            AnswerValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

/// Fields computed by the engine rather than answered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DerivedField {
    Jurisdiction,
}

impl DerivedField {
    pub fn all() -> &'static [DerivedField] {
        &[DerivedField::Jurisdiction]
    }

    /// Key under which the field is stored in the flattened map.
    pub fn key(&self) -> &'static str {
        match self {
            DerivedField::Jurisdiction => "jurisdiction",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|field| field.key() == key)
    }

    /// The question whose answer this field is derived from.
    pub fn source_question(&self) -> &'static str {
        match self {
            DerivedField::Jurisdiction => ids::POSTCODE,
        }
    }

    /// True if answering `question` must re-derive at least one field.
    pub fn is_source(question: &str) -> bool {
        Self::all().iter().any(|field| field.source_question() == question)
    }

    fn derive(&self, source: &AnswerValue) -> Option<AnswerValue> {
        match self {
            DerivedField::Jurisdiction => source
                .as_text()
                .map(|postcode| AnswerValue::from(resolve_jurisdiction(postcode).as_str())),
        }
    }
}

/// Answer map owned by one wizard controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<String, AnswerValue>",
    from = "BTreeMap<String, AnswerValue>"
)]
pub struct Answers {
    given: BTreeMap<QuestionId, AnswerValue>,
    derived: BTreeMap<DerivedField, AnswerValue>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the user's answer to `question`, returning the previous answer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if `question` collides with a derived key.
    pub fn record(
        &mut self,
        question: &QuestionId,
        value: AnswerValue,
    ) -> Result<Option<AnswerValue>, ValidationError> {
        if DerivedField::from_key(question.as_str()).is_some() {
            return Err(ValidationError::invalid_format(
                question.as_str(),
                "derived fields cannot be answered directly",
            ));
        }
        Ok(self.given.insert(question.clone(), value))
    }

    /// Recomputes every derived field from its source answer.
    ///
    /// A field whose source is unanswered is removed.
    pub fn refresh_derived(&mut self) {
        for field in DerivedField::all() {
            let derived = self
                .given
                .get(field.source_question())
                .and_then(|source| field.derive(source));
            match derived {
                Some(value) => {
                    self.derived.insert(*field, value);
                }
                None => {
                    self.derived.remove(field);
                }
            }
        }
    }

    /// The user's answer to a question.
    pub fn get(&self, question: &str) -> Option<&AnswerValue> {
        self.given.get(question)
    }

    pub fn text(&self, question: &str) -> Option<&str> {
        self.get(question).and_then(AnswerValue::as_text)
    }

    pub fn flag(&self, question: &str) -> Option<bool> {
        self.get(question).and_then(AnswerValue::as_flag)
    }

    /// True if `question` was answered with the text `value`.
    pub fn is(&self, question: &str, value: &str) -> bool {
        self.text(question) == Some(value)
    }

    /// True if `question` was answered with any of `values`.
    pub fn is_any(&self, question: &str, values: &[&str]) -> bool {
        self.text(question)
            .map_or(false, |answer| values.contains(&answer))
    }

    pub fn contains(&self, question: &str) -> bool {
        self.given.contains_key(question)
    }

    pub fn derived(&self, field: DerivedField) -> Option<&AnswerValue> {
        self.derived.get(&field)
    }

    pub fn jurisdiction(&self) -> Option<Jurisdiction> {
        self.derived(DerivedField::Jurisdiction)
            .and_then(AnswerValue::as_text)
            .and_then(|value| value.parse().ok())
    }

    /// Drops user answers to questions outside `keep`. Derived fields stay.
    pub fn retain_questions(&mut self, keep: &HashSet<QuestionId>) {
        self.given.retain(|question, _| keep.contains(question));
    }

    /// Answered question ids in key order.
    pub fn question_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.given.keys()
    }

    /// Number of entries, user answers and derived fields together.
    pub fn len(&self) -> usize {
        self.given.len() + self.derived.len()
    }

    pub fn is_empty(&self) -> bool {
        self.given.is_empty() && self.derived.is_empty()
    }

    /// The flattened view used for persistence and hand-off.
    pub fn to_flat_map(&self) -> BTreeMap<String, AnswerValue> {
        self.clone().into()
    }
}

impl From<Answers> for BTreeMap<String, AnswerValue> {
    fn from(answers: Answers) -> Self {
        let mut flat: BTreeMap<String, AnswerValue> = answers
            .given
            .into_iter()
            .map(|(question, value)| (question.as_str().to_string(), value))
            .collect();
        for (field, value) in answers.derived {
            flat.insert(field.key().to_string(), value);
        }
        flat
    }
}

impl From<BTreeMap<String, AnswerValue>> for Answers {
    fn from(flat: BTreeMap<String, AnswerValue>) -> Self {
        let mut answers = Answers::new();
        for (key, value) in flat {
            match DerivedField::from_key(&key) {
                Some(field) => {
                    answers.derived.insert(field, value);
                }
                None => {
                    answers.given.insert(QuestionId::new(key), value);
                }
            }
        }
        answers
    }
}
