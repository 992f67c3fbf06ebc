//! Bag-of-words corpus: vocabulary plus one sparse count vector per document.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::document::Document;
use crate::nlp::NlpPipeline;

pub type TermId = u32;

/// Sparse term counts, sorted by term id.
pub type BowVector = Vec<(TermId, u32)>;

/// Token → id mapping. Ids are assigned in first-occurrence order and are only
/// meaningful for the rebuild that produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vocabulary {
    ids: HashMap<String, TermId>,
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn from_bags(bags: &[Vec<String>]) -> Self {
        let mut vocabulary = Self::default();
        for token in bags.iter().flatten() {
            if !vocabulary.ids.contains_key(token) {
                let id = vocabulary.terms.len() as TermId;
                vocabulary.ids.insert(token.clone(), id);
                vocabulary.terms.push(token.clone());
            }
        }
        vocabulary
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn id(&self, token: &str) -> Option<TermId> {
        self.ids.get(token).copied()
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    /// Counts the known tokens of a bag. Unknown tokens are dropped.
    pub fn doc2bow(&self, tokens: &[String]) -> BowVector {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        for id in tokens.iter().filter_map(|t| self.id(t)) {
            *counts.entry(id).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Terms in id order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Vocabulary and vectors derived from one document set.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub vocabulary: Vocabulary,
    pub bags: Vec<Vec<String>>,
    pub vectors: Vec<BowVector>,
}

/// Tokenizes every document in input order and boxes it against a fresh
/// vocabulary. Returns `None` for an empty document set.
pub fn build(nlp: &NlpPipeline, documents: &[Document]) -> Option<Corpus> {
    if documents.is_empty() {
        return None;
    }

    let bags: Vec<Vec<String>> = documents
        .iter()
        .map(|d| nlp.analyze(&d.cleaned_text))
        .collect();
    let vocabulary = Vocabulary::from_bags(&bags);
    let vectors = bags.iter().map(|bag| vocabulary.doc2bow(bag)).collect();

    Some(Corpus {
        vocabulary,
        bags,
        vectors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn doc(filename: &str, text: &str) -> Document {
        Document {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            raw_text: text.to_string(),
            cleaned_text: text.to_string(),
        }
    }

    fn bag(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_vocabulary_assigns_ids_in_first_occurrence_order() {
        let vocab = Vocabulary::from_bags(&[bag(&["rust", "sql"]), bag(&["sql", "go"])]);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.id("rust"), Some(0));
        assert_eq!(vocab.id("sql"), Some(1));
        assert_eq!(vocab.id("go"), Some(2));
        assert_eq!(vocab.term(2), Some("go"));
    }

    #[test]
    fn test_doc2bow_counts_and_sorts() {
        let vocab = Vocabulary::from_bags(&[bag(&["a", "b", "c"])]);
        let bow = vocab.doc2bow(&bag(&["c", "a", "c", "unknown", "c"]));
        assert_eq!(bow, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_doc2bow_of_unknown_tokens_is_empty() {
        let vocab = Vocabulary::from_bags(&[bag(&["a"])]);
        assert!(vocab.doc2bow(&bag(&["zzz"])).is_empty());
    }

    #[test]
    fn test_build_empty_set_is_none() {
        assert!(build(&NlpPipeline::default(), &[]).is_none());
    }

    #[test]
    fn test_build_produces_one_vector_per_document() {
        let docs = vec![
            doc("a.pdf", "python developer python"),
            doc("b.pdf", "java developer"),
        ];
        let corpus = build(&NlpPipeline::default(), &docs).unwrap();
        assert_eq!(corpus.vectors.len(), 2);
        assert_eq!(corpus.bags.len(), 2);

        let python = corpus.vocabulary.id("python").unwrap();
        assert!(corpus.vectors[0].contains(&(python, 2)));
        for token in corpus.bags.iter().flatten() {
            assert!(corpus.vocabulary.id(token).is_some());
        }
    }
}
