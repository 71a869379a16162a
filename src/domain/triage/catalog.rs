//! The standard bereavement triage questionnaire.
//!
//! Entry is `location`. Conditional questions (`police_coroner`,
//! `abroad_country`, `repatriation`, `urgent_burial`) carry visibility
//! predicates and a default edge, so skip-forward can pass over them
//! when they do not apply.

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::answers::Answers;
use super::graph::{GraphIntegrityError, QuestionGraph};
use super::question::Question;

/// Question ids of the standard catalog.
pub mod ids {
    pub const LOCATION: &str = "location";
    pub const POLICE_CORONER: &str = "police_coroner";
    pub const ABROAD_COUNTRY: &str = "abroad_country";
    pub const REPATRIATION: &str = "repatriation";
    pub const POSTCODE: &str = "postcode";
    pub const AGE: &str = "age";
    pub const RELIGION: &str = "religion";
    pub const URGENT_BURIAL: &str = "urgent_burial";
    pub const BURIAL_CREMATION: &str = "burial_cremation";
    pub const WILL: &str = "will";
    pub const FUNERAL_PLAN: &str = "funeral_plan";
    pub const COMPLETE: &str = crate::domain::triage::question::TERMINAL_ID;
}

use ids::*;

static STANDARD: Lazy<Arc<QuestionGraph>> = Lazy::new(|| {
    Arc::new(build_standard().expect("standard triage catalog must be a closed, acyclic graph"))
});

/// The shared, immutable standard graph.
pub fn standard_graph() -> Arc<QuestionGraph> {
    Arc::clone(&STANDARD)
}

fn needs_police_or_coroner(answers: &Answers) -> bool {
    answers.is_any(LOCATION, &["home-unexpected", "crime-scene"])
}

fn died_abroad(answers: &Answers) -> bool {
    answers.is(LOCATION, "abroad")
}

fn requires_urgent_burial(answers: &Answers) -> bool {
    answers.is_any(RELIGION, &["islam", "judaism"])
}

/// Builds the standard graph.
///
/// # Errors
///
/// Only if the definition below is inconsistent.
pub fn build_standard() -> Result<QuestionGraph, GraphIntegrityError> {
    QuestionGraph::new(LOCATION, standard_questions())
}

fn standard_questions() -> Vec<Question> {
    vec![
        Question::single_choice(LOCATION, "Where did the death occur?")
            .describe("This helps us provide the right guidance for your situation")
            .choice_to("home-expected", "At home (expected)", POSTCODE)
            .choice_to("home-unexpected", "At home (unexpected)", POLICE_CORONER)
            .choice_to("hospital", "In hospital", POSTCODE)
            .choice_to("care-home", "In a care home", POSTCODE)
            .choice_to("abroad", "Abroad", ABROAD_COUNTRY)
            .choice_to("crime-scene", "Suspicious circumstances", POLICE_CORONER)
            .assistant_prompts([
                "What counts as expected vs unexpected death?",
                "What happens if death was unexpected?",
                "Who do I contact first?",
            ]),
        Question::single_choice(POLICE_CORONER, "Have you contacted the police or coroner?")
            .describe(
                "For unexpected deaths or suspicious circumstances, the police and coroner must be involved",
            )
            .choice("yes", "Yes, already contacted")
            .choice("no", "No, not yet")
            .visible_if(needs_police_or_coroner)
            .default_next(POSTCODE)
            .assistant_prompts([
                "What will the coroner do?",
                "How long does a coroner investigation take?",
                "Can I arrange the funeral during investigation?",
            ]),
        Question::free_text(ABROAD_COUNTRY, "Which country did the death occur in?")
            .describe("This helps us provide country-specific repatriation guidance")
            .placeholder("e.g., Spain, France, USA")
            .visible_if(died_abroad)
            .default_next(REPATRIATION)
            .assistant_prompts([
                "What documents do I need for repatriation?",
                "How long does repatriation take?",
                "Who handles repatriation arrangements?",
            ]),
        Question::single_choice(REPATRIATION, "Do you need help arranging repatriation to the UK?")
            .describe("We can connect you with specialists who handle international repatriation")
            .choice("yes", "Yes, I need help")
            .choice("no", "No, already arranged")
            .visible_if(died_abroad)
            .default_next(POSTCODE)
            .assistant_prompts([
                "What are the costs of repatriation?",
                "Does travel insurance cover repatriation?",
                "How do I contact the FCDO?",
            ]),
        Question::free_text(POSTCODE, "What is your postcode?")
            .describe(
                "This helps us provide jurisdiction-specific guidance (England/Wales, Scotland, or Northern Ireland)",
            )
            .placeholder("e.g., SW1A 1AA")
            .default_next(AGE)
            .assistant_prompts([
                "Why do you need my postcode?",
                "What are the differences between jurisdictions?",
                "How do registration deadlines differ?",
            ]),
        Question::single_choice(AGE, "Age category of the deceased")
            .choice("adult", "Adult")
            .choice("child", "Child (under 18)")
            .choice("stillbirth", "Stillbirth")
            .default_next(RELIGION)
            .assistant_prompts([
                "Are there different procedures for children?",
                "What is the definition of stillbirth?",
                "What support is available for child bereavement?",
            ]),
        // Every religion routes through urgent_burial; its predicate decides.
        Question::single_choice(RELIGION, "Religious or cultural background")
            .describe("This helps us provide culturally appropriate guidance")
            .choice("islam", "Islam")
            .choice("judaism", "Judaism")
            .choice("hindu", "Hindu")
            .choice("sikh", "Sikh")
            .choice("christian", "Christian")
            .choice("catholic", "Catholic")
            .choice("none", "None/Humanist")
            .default_next(URGENT_BURIAL)
            .assistant_prompts([
                "What are the religious requirements for funerals?",
                "How do I find a religious funeral director?",
                "What if the family has different religious views?",
            ]),
        Question::single_choice(
            URGENT_BURIAL,
            "Do you have a community contact or preferred religious funeral director?",
        )
        .describe(
            "Islamic and Jewish traditions typically require burial within 24 hours. We can connect you with specialist funeral directors immediately.",
        )
        .choice("yes", "Yes, I have a contact")
        .choice("no", "No, I need help urgently")
        .visible_if(requires_urgent_burial)
        .default_next(BURIAL_CREMATION)
        .assistant_prompts([
            "What are the 24-hour burial requirements?",
            "Can I delay burial for family to arrive?",
            "What if I cannot find a religious funeral director?",
        ]),
        Question::single_choice(BURIAL_CREMATION, "Burial or cremation preference?")
            .choice("burial", "Burial")
            .choice("cremation", "Cremation")
            .choice("unsure", "Not sure yet")
            .default_next(WILL)
            .assistant_prompts([
                "What are the cost differences?",
                "What are the environmental considerations?",
                "Can I change my mind later?",
            ]),
        Question::single_choice(WILL, "Is there a Will?")
            .describe("The Will names the executor and may contain funeral wishes")
            .choice("yes", "Yes, Will found")
            .choice("no", "No Will found")
            .choice("unsure", "Not sure / Still looking")
            .default_next(FUNERAL_PLAN)
            .assistant_prompts([
                "Where should I look for the Will?",
                "What happens if there is no Will?",
                "What is the National Will Register?",
            ]),
        Question::single_choice(FUNERAL_PLAN, "Is there a pre-paid funeral plan?")
            .describe("A funeral plan may cover significant costs")
            .choice("yes", "Yes, there is a plan")
            .choice("no", "No plan")
            .choice("unsure", "Not sure")
            .default_next(COMPLETE)
            .assistant_prompts([
                "How do I find out if there is a funeral plan?",
                "What does a funeral plan typically cover?",
                "Can I still use a different funeral director?",
            ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::{AnswerValue, QuestionId, QuestionKind};

    #[test]
    fn standard_graph_builds() {
        let graph = build_standard().unwrap();
        assert_eq!(graph.entry().as_str(), LOCATION);
        assert_eq!(graph.len(), 11);
    }

    #[test]
    fn every_question_is_reachable_from_entry() {
        let graph = standard_graph();
        assert_eq!(graph.reachable().len(), graph.len());
    }

    #[test]
    fn graph_closure_holds_for_every_answer() {
        let graph = standard_graph();
        let reachable = graph.reachable();
        for id in &reachable {
            let question = graph.get(id.as_str()).unwrap();
            let values: Vec<AnswerValue> = match question.kind {
                QuestionKind::SingleChoice => question
                    .options
                    .iter()
                    .map(|o| AnswerValue::from(o.value.as_str()))
                    .collect(),
                QuestionKind::FreeText => vec![AnswerValue::from("EH3 9DR")],
                QuestionKind::Boolean => vec![AnswerValue::from(true), AnswerValue::from(false)],
            };
            for value in values {
                let mut answers = Answers::new();
                answers.record(id, value.clone()).unwrap();
                let next = graph.resolve(id.as_str(), &value, &answers).unwrap();
                assert!(
                    next.is_complete() || reachable.contains(&next),
                    "{} -> {} escapes the graph",
                    id,
                    next
                );
            }
        }
    }

    #[test]
    fn conditional_questions_have_default_edges() {
        let graph = standard_graph();
        for question in graph.questions().filter(|q| q.visible_if.is_some()) {
            assert!(question.default_next.is_some(), "{} cannot be skipped", question.id);
        }
    }

    #[test]
    fn urgent_burial_only_for_islam_and_judaism() {
        let graph = standard_graph();
        for religion in ["islam", "judaism", "hindu", "sikh", "christian", "catholic", "none"] {
            let mut answers = Answers::new();
            answers
                .record(&QuestionId::new(RELIGION), religion.into())
                .unwrap();
            let visible = graph.is_visible(URGENT_BURIAL, &answers).unwrap();
            assert_eq!(visible, religion == "islam" || religion == "judaism", "{}", religion);
        }
    }

    #[test]
    fn police_question_only_after_unexpected_death() {
        let graph = standard_graph();
        for (location, expected) in [
            ("home-expected", false),
            ("home-unexpected", true),
            ("hospital", false),
            ("crime-scene", true),
        ] {
            let mut answers = Answers::new();
            answers
                .record(&QuestionId::new(LOCATION), location.into())
                .unwrap();
            assert_eq!(graph.is_visible(POLICE_CORONER, &answers).unwrap(), expected);
        }
    }
}
