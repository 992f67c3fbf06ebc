use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::extraction::extractor::TextExtractor;
use crate::ranking::engine::RankingEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Store + fitted model. Mutations take the write lock for the whole
    /// rebuild; queries share the read lock.
    pub engine: Arc<RwLock<RankingEngine>>,
    /// Pluggable text extractor. Default: PdfTextExtractor.
    pub extractor: Arc<dyn TextExtractor>,
    pub config: Config,
}
