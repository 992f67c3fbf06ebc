mod ats;
mod config;
mod errors;
mod extraction;
mod models;
mod nlp;
mod pipeline;
mod ranking;
mod resumes;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::extractor::{PdfTextExtractor, TextExtractor};
use crate::nlp::NlpPipeline;
use crate::ranking::engine::RankingEngine;
use crate::resumes::files::scan_upload_dir;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume ranker v{}", env!("CARGO_PKG_VERSION"));

    // NLP resources are required; a bad stopword file aborts startup.
    let nlp = Arc::new(
        NlpPipeline::load(config.stopwords_path.as_deref())
            .context("failed to load NLP pipeline")?,
    );

    let extractor: Arc<dyn TextExtractor> = Arc::new(PdfTextExtractor);

    // Seed the corpus from whatever is already in the upload directory
    let params = config.lda_params();
    let upload_dir = config.upload_dir.clone();
    let scan_extractor = extractor.clone();
    let engine = tokio::task::spawn_blocking(move || -> Result<RankingEngine> {
        let resumes = scan_upload_dir(&upload_dir, scan_extractor.as_ref())?;
        let mut engine = RankingEngine::new(nlp, params);
        let accepted = engine.seed(resumes);
        info!(
            accepted,
            active = engine.resume_count(),
            excluded = engine.excluded().len(),
            "corpus seeded"
        );
        Ok(engine)
    })
    .await
    .context("startup seeding task panicked")??;

    let state = AppState {
        engine: Arc::new(RwLock::new(engine)),
        extractor,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
