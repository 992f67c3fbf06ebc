use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::resumes::handlers::run_blocking;
use crate::state::AppState;

/// GET /health
/// Returns service status, version and the size of the active corpus.
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let engine = state.engine.clone();
    let resume_count = run_blocking(move || Ok(engine.read().resume_count())).await?;
    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-ranker",
        "resume_count": resume_count
    })))
}
