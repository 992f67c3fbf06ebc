//! Rule-based named-entity recognition for resume text.
//!
//! Recognisers run in priority order (Organization, Date, Location, Person);
//! a span is kept only if it does not overlap a span accepted earlier.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::extraction::gazetteer::SKILL_WORDS;
use crate::nlp::stopwords::is_stopword;
use crate::nlp::tokenizer::{tokenize, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    Organization,
    Date,
    Person,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

const ORG_SUFFIXES: &[&str] = &[
    "Inc", "Corp", "Corporation", "LLC", "Ltd", "Limited", "Company", "University", "College",
    "Institute", "Technologies", "Labs", "Laboratories", "Bank", "Group", "School", "Solutions",
    "Consulting", "Foundation", "Academy", "Agency", "Partners", "Holdings",
];

const MONTH_WORDS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep",
    "sept", "oct", "nov", "dec", "present", "current",
];

/// Resume vocabulary that shows up title-cased but is never part of a name.
const NON_NAME_WORDS: &[&str] = &[
    "resume", "curriculum", "vitae", "summary", "profile", "objective", "experience", "education",
    "skills", "projects", "project", "contact", "email", "phone", "mobile", "address", "linkedin",
    "certifications", "certification", "achievements", "awards", "languages", "interests",
    "references", "publications", "internship", "intern", "experienced", "senior", "junior",
    "lead", "principal", "software", "engineer", "engineering", "developer", "development",
    "manager", "management", "analyst", "scientist", "science", "data", "designer", "consultant",
    "architect", "administrator", "specialist", "associate", "director", "head", "team",
    "technical", "professional", "work", "history", "employment", "bachelor", "master",
    "degree", "diploma", "technology", "computer", "information", "systems", "responsible",
    "developed", "designed", "led", "managed", "built", "created", "implemented", "full",
    "stack", "frontend", "backend", "web", "mobile", "cloud", "tools", "frameworks",
];

const LOCATIONS: &[&str] = &[
    // countries
    "India", "United States", "USA", "United Kingdom", "UK", "Canada", "Australia", "Germany",
    "France", "Spain", "Italy", "Netherlands", "Ireland", "Singapore", "Japan", "China",
    "Brazil", "Mexico", "Sweden", "Norway", "Denmark", "Finland", "Switzerland", "Poland",
    "Israel", "Nigeria", "Kenya", "South Africa", "United Arab Emirates", "UAE", "Pakistan",
    "Bangladesh", "Sri Lanka", "Nepal", "Indonesia", "Malaysia", "Philippines", "Vietnam",
    "New Zealand", "Portugal", "Belgium", "Austria",
    // cities
    "Mumbai", "Delhi", "New Delhi", "Bangalore", "Bengaluru", "Hyderabad", "Chennai", "Pune",
    "Kolkata", "Ahmedabad", "Noida", "Gurgaon", "Gurugram", "Thane", "Navi Mumbai", "Jaipur",
    "New York", "San Francisco", "Los Angeles", "Seattle", "Boston", "Chicago", "Austin",
    "Denver", "Atlanta", "Miami", "San Jose", "San Diego", "Washington", "London", "Manchester",
    "Edinburgh", "Dublin", "Berlin", "Munich", "Paris", "Amsterdam", "Madrid", "Barcelona",
    "Rome", "Milan", "Zurich", "Stockholm", "Toronto", "Vancouver", "Montreal", "Sydney",
    "Melbourne", "Tokyo", "Beijing", "Shanghai", "Hong Kong", "Dubai", "Tel Aviv", "Lagos",
    "Nairobi",
    // US states
    "California", "Texas", "Florida", "Illinois", "Massachusetts", "Georgia", "Virginia",
    "Ohio", "Michigan", "Colorado", "Oregon", "Arizona", "Maharashtra", "Karnataka",
    "Tamil Nadu", "Kerala", "Gujarat", "Telangana",
];

lazy_static! {
    static ref DATE_RE: Regex = {
        let point = format!(r"(?:{MONTH}\.?\s+(?:19|20)\d{{2}}|\d{{1,2}}/(?:19|20)\d{{2}}|(?:19|20)\d{{2}})");
        let end = format!(r"(?:{point}|present|current|now)");
        Regex::new(&format!(r"(?i)\b{point}(?:\s*(?:-|–|—|to)\s*{end})?\b")).expect("valid regex")
    };

    static ref ORG_RE: Regex = {
        let suffixes = ORG_SUFFIXES.join("|");
        Regex::new(&format!(
            r"\b(?:University|Institute|College|School|Bank)\s+of(?:\s+[A-Z][\w&'-]*){{1,3}}|\b(?:[A-Z][\w&'-]*\s+){{0,3}}(?:{suffixes})\b\.?"
        ))
        .expect("valid regex")
    };

    static ref LOCATION_PATTERNS: Vec<Vec<String>> = {
        let mut patterns: Vec<Vec<String>> = LOCATIONS
            .iter()
            .map(|loc| loc.split_whitespace().map(str::to_lowercase).collect())
            .collect();
        // Longest first so "New Delhi" wins over "Delhi".
        patterns.sort_by(|a, b| b.len().cmp(&a.len()));
        patterns
    };

    static ref EXCLUDED_NAME_WORDS: HashSet<String> = {
        let mut words: HashSet<String> = NON_NAME_WORDS.iter().map(|w| w.to_string()).collect();
        words.extend(MONTH_WORDS.iter().map(|w| w.to_string()));
        words.extend(ORG_SUFFIXES.iter().map(|w| w.to_lowercase()));
        words.extend(LOCATIONS.iter().flat_map(|l| l.split_whitespace().map(str::to_lowercase)));
        words.extend(SKILL_WORDS.iter().cloned());
        words
    };
}

/// Stateless recogniser; all rule data is compiled once on first use.
#[derive(Debug, Clone, Default)]
pub struct EntityRecognizer;

impl EntityRecognizer {
    pub fn recognize(&self, text: &str) -> Vec<Entity> {
        let tokens = tokenize(text);
        let mut accepted: Vec<Entity> = Vec::new();

        let regex_spans = |re: &Regex, label: EntityLabel| {
            re.find_iter(text)
                .map(|m| Entity {
                    text: m.as_str().to_string(),
                    label,
                    start: m.start(),
                    end: m.end(),
                })
                .collect::<Vec<_>>()
        };

        let candidates = regex_spans(&ORG_RE, EntityLabel::Organization)
            .into_iter()
            .chain(regex_spans(&DATE_RE, EntityLabel::Date))
            .chain(location_spans(text, &tokens))
            .chain(person_spans(text, &tokens));

        // Candidates arrive grouped by recogniser priority.
        for candidate in candidates {
            let overlaps = accepted
                .iter()
                .any(|e| candidate.start < e.end && e.start < candidate.end);
            if !overlaps {
                accepted.push(candidate);
            }
        }

        accepted.sort_by_key(|e| e.start);
        accepted
    }
}

fn location_spans(text: &str, tokens: &[Token<'_>]) -> Vec<Entity> {
    let mut spans = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let starts_upper = tokens[i]
            .text
            .chars()
            .next()
            .is_some_and(char::is_uppercase);
        let matched = starts_upper
            .then(|| {
                LOCATION_PATTERNS.iter().find(|pattern| {
                    let end = i + pattern.len();
                    end <= tokens.len()
                        && tokens[i..end]
                            .iter()
                            .zip(pattern.iter())
                            .all(|(t, p)| t.text.to_lowercase() == *p)
                })
            })
            .flatten();

        match matched {
            Some(pattern) => {
                let last = &tokens[i + pattern.len() - 1];
                spans.push(Entity {
                    text: text[tokens[i].start..last.end].to_string(),
                    label: EntityLabel::Location,
                    start: tokens[i].start,
                    end: last.end,
                });
                i += pattern.len();
            }
            None => i += 1,
        }
    }
    spans
}

fn is_name_word(token: &Token<'_>) -> bool {
    if !(token.is_title_case() || token.is_upper_word()) {
        return false;
    }
    let lower = token.text.to_lowercase();
    !is_stopword(&lower) && !EXCLUDED_NAME_WORDS.contains(&lower)
}

fn flush_person(text: &str, run: &mut Vec<&Token<'_>>, spans: &mut Vec<Entity>) {
    if (2..=3).contains(&run.len()) {
        let (first, last) = (run[0], run[run.len() - 1]);
        spans.push(Entity {
            text: text[first.start..last.end].to_string(),
            label: EntityLabel::Person,
            start: first.start,
            end: last.end,
        });
    }
    run.clear();
}

/// Runs of two or three capitalised words separated by single spaces. All
/// words in a run share a shape (all Title-case or all UPPER).
fn person_spans(text: &str, tokens: &[Token<'_>]) -> Vec<Entity> {
    let mut spans = Vec::new();
    let mut run: Vec<&Token<'_>> = Vec::new();

    for token in tokens {
        let continues = match run.last() {
            Some(prev) => {
                &text[prev.end..token.start] == " "
                    && prev.is_title_case() == token.is_title_case()
            }
            None => true,
        };
        if !is_name_word(token) {
            flush_person(text, &mut run, &mut spans);
            continue;
        }
        if !continues {
            flush_person(text, &mut run, &mut spans);
        }
        run.push(token);
    }
    flush_person(text, &mut run, &mut spans);

    spans
}
