//! Typed reading of a completed answer bundle.
//!
//! The engine treats answers as opaque tokens; guidance generation wants
//! typed facts. Unknown or missing tokens decode to `None` rather than
//! failing, since the bundle is only ever produced by the engine itself.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::answers::Answers;
use super::catalog::ids;
use super::jurisdiction::Jurisdiction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeathLocation {
    HomeExpected,
    HomeUnexpected,
    Hospital,
    CareHome,
    Abroad,
    CrimeScene,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeCategory {
    Adult,
    Child,
    Stillbirth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Religion {
    Islam,
    Judaism,
    Hindu,
    Sikh,
    Christian,
    Catholic,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BurialPreference {
    Burial,
    Cremation,
    Unsure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Nationality {
    Uk,
    Other,
}

/// Typed facts collected by the triage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageSummary {
    pub death_location: Option<DeathLocation>,
    pub jurisdiction: Option<Jurisdiction>,
    pub police_contacted: Option<bool>,
    pub has_will: Option<bool>,
    pub has_funeral_plan: Option<bool>,
    pub age_category: Option<AgeCategory>,
    pub religion: Option<Religion>,
    pub burial_preference: Option<BurialPreference>,
    pub postcode: Option<String>,
    pub nationality: Nationality,
    pub needs_repatriation: bool,
    pub needs_urgent_burial_help: bool,
}

impl TriageSummary {
    pub fn from_answers(answers: &Answers) -> Self {
        Self {
            death_location: token(answers, ids::LOCATION),
            jurisdiction: answers.jurisdiction(),
            police_contacted: yes_no(answers, ids::POLICE_CORONER),
            has_will: yes_no(answers, ids::WILL),
            has_funeral_plan: yes_no(answers, ids::FUNERAL_PLAN),
            age_category: token(answers, ids::AGE),
            religion: token(answers, ids::RELIGION),
            burial_preference: token(answers, ids::BURIAL_CREMATION),
            postcode: answers.text(ids::POSTCODE).map(str::to_string),
            nationality: if answers.contains(ids::ABROAD_COUNTRY) {
                Nationality::Other
            } else {
                Nationality::Uk
            },
            needs_repatriation: answers.is(ids::REPATRIATION, "yes"),
            needs_urgent_burial_help: answers.is(ids::URGENT_BURIAL, "no"),
        }
    }

    /// Days allowed to register the death, once the jurisdiction is known.
    pub fn registration_deadline_days(&self) -> Option<u8> {
        self.jurisdiction
            .map(|jurisdiction| jurisdiction.registration_deadline_days())
    }
}

fn token<T: DeserializeOwned>(answers: &Answers, question: &str) -> Option<T> {
    let text = answers.text(question)?;
    serde_json::from_value(serde_json::Value::String(text.to_string())).ok()
}

// "unsure" and anything else stays unknown.
fn yes_no(answers: &Answers, question: &str) -> Option<bool> {
    if let Some(flag) = answers.flag(question) {
        return Some(flag);
    }
    match answers.text(question)? {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}
