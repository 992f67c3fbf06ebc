//! Candidate name and email from resume text.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::nlp::ner::EntityLabel;
use crate::nlp::NlpPipeline;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex");
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Name is the first Person entity; email is the first address-shaped match.
pub fn extract_identity(nlp: &NlpPipeline, cleaned_text: &str) -> Identity {
    let name = nlp
        .entities(cleaned_text)
        .into_iter()
        .find(|e| e.label == EntityLabel::Person)
        .map(|e| e.text);
    let email = EMAIL_RE.find(cleaned_text).map(|m| m.as_str().to_string());

    Identity { name, email }
}
