//! Relevance pipeline: Cleaner → NLP → Corpus Builder → Topic Model → Scorer.
//!
//! `rebuild` is the only way derived state is produced. It always starts from
//! the full resume set; there is no incremental path.

pub mod cleaner;
pub mod corpus;
pub mod lda;
pub mod scorer;

use std::time::Instant;

use tracing::{debug, info};

use crate::models::document::{Document, StoredResume};
use crate::nlp::NlpPipeline;
use crate::pipeline::cleaner::clean;
use crate::pipeline::corpus::{BowVector, Corpus};
use crate::pipeline::lda::{LdaParams, TopicDistribution, TopicModel};

/// Everything derived from one resume set. Built completely before it is
/// published, then only read.
#[derive(Debug)]
pub struct FittedCorpus {
    pub documents: Vec<Document>,
    pub corpus: Corpus,
    pub model: TopicModel,
    /// Topic distribution per document, aligned with `documents`.
    pub topic_distributions: Vec<TopicDistribution>,
}

impl FittedCorpus {
    pub fn document(&self, filename: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.filename == filename)
    }

    /// Boxes arbitrary text against the live vocabulary.
    pub fn bow(&self, nlp: &NlpPipeline, text: &str) -> BowVector {
        self.corpus.vocabulary.doc2bow(&nlp.analyze(text))
    }

    pub fn project(&self, nlp: &NlpPipeline, text: &str) -> TopicDistribution {
        self.model.infer(&self.bow(nlp, text))
    }
}

#[derive(Debug)]
pub struct RebuildOutcome {
    /// `None` when no resume survives cleaning.
    pub fitted: Option<FittedCorpus>,
    /// Filenames whose text cleaned to nothing.
    pub excluded: Vec<String>,
}

/// Cleans every stored resume, tokenizes the survivors, builds a fresh
/// vocabulary and fits a new topic model.
pub fn rebuild(entries: &[StoredResume], nlp: &NlpPipeline, params: &LdaParams) -> RebuildOutcome {
    let started = Instant::now();
    let mut documents = Vec::with_capacity(entries.len());
    let mut excluded = Vec::new();

    for entry in entries {
        match clean(&entry.raw_text) {
            Some(cleaned_text) => documents.push(Document {
                id: entry.id,
                filename: entry.filename.clone(),
                raw_text: entry.raw_text.clone(),
                cleaned_text,
            }),
            None => {
                debug!(filename = %entry.filename, "resume is empty after cleaning; excluded");
                excluded.push(entry.filename.clone());
            }
        }
    }

    let Some(corpus) = corpus::build(nlp, &documents) else {
        info!(excluded = excluded.len(), "no resumes to fit; model cleared");
        return RebuildOutcome {
            fitted: None,
            excluded,
        };
    };

    let model = TopicModel::fit(&corpus.vectors, corpus.vocabulary.len(), params);
    let topic_distributions = corpus.vectors.iter().map(|v| model.infer(v)).collect();

    info!(
        documents = documents.len(),
        excluded = excluded.len(),
        vocabulary = corpus.vocabulary.len(),
        num_topics = params.num_topics,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "topic model rebuilt"
    );

    RebuildOutcome {
        fitted: Some(FittedCorpus {
            documents,
            corpus,
            model,
            topic_distributions,
        }),
        excluded,
    }
}
