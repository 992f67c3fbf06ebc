//! Ranking engine. Owns the resume store and the fitted corpus snapshot.
//!
//! Mutations (`submit_*`, `remove_document`, `seed`) rebuild the whole
//! pipeline and publish a new snapshot in one assignment. Queries read the
//! current snapshot only. `AppState` keeps the engine behind a single
//! `RwLock`, so readers never see a half-built model.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::gazetteer::match_skills;
use crate::extraction::identity::{extract_identity, Identity};
use crate::models::document::StoredResume;
use crate::nlp::NlpPipeline;
use crate::pipeline::lda::LdaParams;
use crate::pipeline::{rebuild, scorer, FittedCorpus};
use crate::ranking::store::ResumeStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    Accepted,
    Duplicate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeScore {
    pub filename: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeEntities {
    pub filename: String,
    pub tech_entities: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicTerm {
    pub term: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicSummary {
    pub topic: usize,
    pub terms: Vec<TopicTerm>,
}

pub struct RankingEngine {
    nlp: Arc<NlpPipeline>,
    params: LdaParams,
    store: ResumeStore,
    fitted: Option<Arc<FittedCorpus>>,
    excluded: Vec<String>,
}

impl RankingEngine {
    pub fn new(nlp: Arc<NlpPipeline>, params: LdaParams) -> Self {
        Self {
            nlp,
            params,
            store: ResumeStore::default(),
            fitted: None,
            excluded: Vec::new(),
        }
    }

    pub fn params(&self) -> &LdaParams {
        &self.params
    }

    /// Loads the startup resume set with a single rebuild. Returns how many
    /// entries were accepted (duplicates are skipped).
    pub fn seed(&mut self, resumes: Vec<StoredResume>) -> usize {
        let accepted = resumes
            .into_iter()
            .filter(|r| self.store.insert(r.clone()))
            .count();
        self.rebuild();
        accepted
    }

    pub fn submit_document(&mut self, filename: &str, raw_text: &str) -> SubmitOutcome {
        let outcome = self.insert(filename, raw_text);
        if outcome == SubmitOutcome::Accepted {
            self.rebuild();
        }
        outcome
    }

    /// Adds several documents and rebuilds once if any were accepted.
    pub fn submit_documents(&mut self, documents: Vec<(String, String)>) -> Vec<(String, SubmitOutcome)> {
        let outcomes: Vec<(String, SubmitOutcome)> = documents
            .into_iter()
            .map(|(filename, raw_text)| {
                let outcome = self.insert(&filename, &raw_text);
                (filename, outcome)
            })
            .collect();

        if outcomes.iter().any(|(_, o)| *o == SubmitOutcome::Accepted) {
            self.rebuild();
        }
        outcomes
    }

    pub fn remove_document(&mut self, filename: &str) -> Result<(), AppError> {
        self.store
            .remove(filename)
            .ok_or_else(|| AppError::NotFound(format!("File '{filename}' not found")))?;
        info!(filename, "resume removed");
        self.rebuild();
        Ok(())
    }

    /// Scores every active resume against a job requirement, in store order.
    pub fn score_against(&self, job_requirement: &str) -> Result<Vec<ResumeScore>, AppError> {
        if job_requirement.trim().is_empty() {
            return Err(AppError::Validation(
                "Job requirement cannot be empty".to_string(),
            ));
        }
        let fitted = self.fitted()?;

        let job_topics = fitted.project(&self.nlp, job_requirement);
        let num_topics = fitted.model.num_topics();

        Ok(fitted
            .documents
            .iter()
            .zip(&fitted.topic_distributions)
            .map(|(doc, topics)| ResumeScore {
                filename: doc.filename.clone(),
                score: scorer::score(topics, &job_topics, num_topics),
            })
            .collect())
    }

    pub fn extract_entities(&self, filename: &str) -> Result<BTreeSet<String>, AppError> {
        let fitted = self.fitted()?;
        let doc = fitted
            .document(filename)
            .ok_or_else(|| AppError::NotFound(format!("Resume '{filename}' not found")))?;
        Ok(match_skills(&doc.cleaned_text))
    }

    pub fn extract_all_entities(&self) -> Result<Vec<ResumeEntities>, AppError> {
        let fitted = self.fitted()?;
        Ok(fitted
            .documents
            .iter()
            .map(|doc| ResumeEntities {
                filename: doc.filename.clone(),
                tech_entities: match_skills(&doc.cleaned_text),
            })
            .collect())
    }

    pub fn extract_identity(&self, filename: &str) -> Result<Identity, AppError> {
        let fitted = self.fitted()?;
        let doc = fitted
            .document(filename)
            .ok_or_else(|| AppError::NotFound(format!("Resume '{filename}' not found")))?;
        Ok(extract_identity(&self.nlp, &doc.cleaned_text))
    }

    /// Top `n` vocabulary terms for each topic of the current model.
    pub fn topics(&self, n: usize) -> Result<Vec<TopicSummary>, AppError> {
        let fitted = self.fitted()?;
        let vocabulary = &fitted.corpus.vocabulary;
        Ok((0..fitted.model.num_topics())
            .map(|topic| TopicSummary {
                topic,
                terms: fitted
                    .model
                    .top_terms(topic, n)
                    .into_iter()
                    .filter_map(|(id, weight)| {
                        vocabulary.term(id).map(|term| TopicTerm {
                            term: term.to_string(),
                            weight,
                        })
                    })
                    .collect(),
            })
            .collect())
    }

    pub fn snapshot(&self) -> Option<Arc<FittedCorpus>> {
        self.fitted.clone()
    }

    pub fn stored(&self) -> &[StoredResume] {
        self.store.entries()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.store.contains(filename)
    }

    /// Number of resumes in the active corpus.
    pub fn resume_count(&self) -> usize {
        self.fitted.as_ref().map_or(0, |f| f.documents.len())
    }

    /// Stored resumes that cleaned to nothing and are left out of the corpus.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    fn fitted(&self) -> Result<&FittedCorpus, AppError> {
        self.fitted.as_deref().ok_or(AppError::NoCorpus)
    }

    fn insert(&mut self, filename: &str, raw_text: &str) -> SubmitOutcome {
        if self.store.insert(StoredResume::new(filename, raw_text.trim())) {
            info!(filename, "resume accepted");
            SubmitOutcome::Accepted
        } else {
            info!(filename, "duplicate resume skipped");
            SubmitOutcome::Duplicate
        }
    }

    fn rebuild(&mut self) {
        let outcome = rebuild(self.store.entries(), &self.nlp, &self.params);
        self.fitted = outcome.fitted.map(Arc::new);
        self.excluded = outcome.excluded;
    }
}
