//! Technical-skill gazetteer: fixed keyword list matched case-insensitively as
//! whole token sequences.

use std::collections::BTreeSet;

use lazy_static::lazy_static;

use crate::nlp::tokenizer::{tokenize, Token};

/// Languages, frameworks, platforms and disciplines recognised in resumes.
pub const TECH_SKILLS: &[&str] = &[
    "Python", "Java", "C++", "JavaScript", "PHP", "SQL", "MySQL", "MongoDB", "SQLite", "BigQuery",
    "PostgreSQL", "HTML", "CSS", "Dart", "R", "Ruby", "Swift", "Kotlin", "TypeScript",
    "NumPy", "Pandas", "SciPy", "Dask", "GeoPandas", "Sklearn", "NLTK", "OpenCV", "Keras",
    "TensorFlow", "Pytorch", "AzureML", "Matplotlib", "Seaborn", "Plotly", "Flask", "Django",
    "Node.js", "React", "Flutter", "Bootstrap", "CodeIgniter", "REST API", "WebRTC", "MLOps",
    "Docker", "Kubernetes", "Kubeflow", "AWS", "GCP", "Azure", "Google Colab", "Heroku",
    "Jupyter", "Git", "Github", "VSCode", "Machine Learning", "Deep Learning", "NLP",
    "Computer Vision", "Data Engineering", "IoT", "Cloud Computing", "AutoCAD",
];

lazy_static! {
    /// Each skill pre-split into lowercase word tokens.
    static ref PATTERNS: Vec<Vec<String>> = TECH_SKILLS
        .iter()
        .map(|skill| tokenize(skill).iter().map(|t| t.text.to_lowercase()).collect())
        .collect();

    /// Lowercased single words that appear anywhere in the gazetteer.
    pub static ref SKILL_WORDS: std::collections::HashSet<String> =
        PATTERNS.iter().flatten().cloned().collect();
}

/// Returns the surface strings (as written in `text`) of every gazetteer
/// skill that occurs in it.
pub fn match_skills(text: &str) -> BTreeSet<String> {
    let tokens = tokenize(text);
    let lowered: Vec<String> = tokens.iter().map(|t| t.text.to_lowercase()).collect();
    let mut found = BTreeSet::new();

    for pattern in PATTERNS.iter().filter(|p| !p.is_empty()) {
        for start in 0..lowered.len() {
            let end = start + pattern.len();
            if end > lowered.len() {
                break;
            }
            if lowered[start..end] == pattern[..] {
                found.insert(surface(text, &tokens[start], &tokens[end - 1]));
            }
        }
    }

    found
}

fn surface(text: &str, first: &Token<'_>, last: &Token<'_>) -> String {
    text[first.start..last.end].to_string()
}
