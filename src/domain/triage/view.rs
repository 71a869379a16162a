//! Render model handed to the host UI.

use serde::Serialize;

use super::answers::AnswerValue;
use super::question::{Question, QuestionId, QuestionKind};
use super::session::TriageSession;

/// One selectable option as the UI shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
}

/// Everything needed to render the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub prompt: String,
    pub description: Option<String>,
    pub kind: QuestionKind,
    pub options: Vec<OptionView>,
    pub placeholder: Option<String>,
    pub assistant_prompts: Vec<String>,
    /// Answer given on an earlier visit, offered for re-editing.
    pub previous_answer: Option<AnswerValue>,
    pub can_go_back: bool,
    /// 1-based position along the path taken so far.
    pub step_number: usize,
}

impl QuestionView {
    pub fn build(question: &Question, session: &TriageSession) -> Self {
        Self {
            id: question.id.clone(),
            prompt: question.prompt.clone(),
            description: question.description.clone(),
            kind: question.kind,
            options: question
                .options
                .iter()
                .map(|option| OptionView {
                    value: option.value.clone(),
                    label: option.label.clone(),
                })
                .collect(),
            placeholder: question.placeholder.clone(),
            assistant_prompts: question.assistant_prompts.clone(),
            previous_answer: session.answers().get(question.id.as_str()).cloned(),
            can_go_back: !session.history().is_empty(),
            step_number: session.history().len() + 1,
        }
    }
}
