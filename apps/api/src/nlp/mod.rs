//! Natural-language pipeline: tokenization, stopword filtering and rule-based
//! entity recognition. Loaded once at startup and shared read-only.

pub mod ner;
pub mod stopwords;
pub mod tokenizer;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::nlp::ner::{Entity, EntityRecognizer};
use crate::nlp::stopwords::is_stopword;
use crate::nlp::tokenizer::tokenize;

#[derive(Debug, Clone, Default)]
pub struct NlpPipeline {
    extra_stopwords: HashSet<String>,
    recognizer: EntityRecognizer,
}

impl NlpPipeline {
    /// Builds the pipeline, optionally merging a newline-separated stopword
    /// file. A configured file that cannot be read is a startup failure.
    pub fn load(extra_stopwords_path: Option<&Path>) -> Result<Self> {
        let extra_stopwords = match extra_stopwords_path {
            Some(path) => {
                let contents = std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read stopword file '{}'", path.display())
                })?;
                parse_stopwords(&contents)
            }
            None => HashSet::new(),
        };

        info!(
            extra_stopwords = extra_stopwords.len(),
            "NLP pipeline loaded"
        );

        Ok(Self {
            extra_stopwords,
            recognizer: EntityRecognizer,
        })
    }

    pub fn is_stop(&self, lowercase_token: &str) -> bool {
        is_stopword(lowercase_token) || self.extra_stopwords.contains(lowercase_token)
    }

    pub fn entities(&self, text: &str) -> Vec<Entity> {
        self.recognizer.recognize(text)
    }

    /// Lowercased word tokens with stopwords and punctuation removed.
    pub fn content_tokens(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter(|t| !t.is_punct())
            .map(|t| t.text.to_lowercase())
            .filter(|t| !self.is_stop(t))
            .collect()
    }

    /// Token bag for one document: entity surface texts first, then content
    /// tokens, each in document order. Not deduplicated.
    pub fn analyze(&self, cleaned_text: &str) -> Vec<String> {
        let mut bag: Vec<String> = self
            .entities(cleaned_text)
            .into_iter()
            .map(|e| e.text)
            .collect();
        bag.extend(self.content_tokens(cleaned_text));
        bag
    }
}

fn parse_stopwords(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}
