use std::collections::HashSet;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ats::{self, AtsReport};
use crate::errors::AppError;
use crate::models::document::StoredResume;
use crate::ranking::engine::{ResumeEntities, SubmitOutcome, TopicSummary};
use crate::resumes::files::{is_pdf, sanitize_filename};
use crate::state::AppState;

const DEFAULT_TOPIC_TERMS: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<StoredResume>,
    pub resume_count: usize,
    pub excluded: Vec<String>,
}

#[derive(Serialize)]
pub struct FailedFile {
    pub filename: String,
    pub reason: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub uploaded_files: Vec<String>,
    pub skipped_files: Vec<String>,
    pub failed_files: Vec<FailedFile>,
    pub resume_count: usize,
}

#[derive(Deserialize)]
pub struct DeleteRequest {
    pub filename: Option<String>,
}

/// Result of saving and submitting one upload batch under the write lock.
#[derive(Default)]
struct SavedBatch {
    uploaded: Vec<String>,
    skipped: Vec<String>,
    failed: Vec<FailedFile>,
    resume_count: usize,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub resume_count: usize,
}

#[derive(Deserialize)]
pub struct RateRequest {
    pub job_requirement: Option<String>,
}

#[derive(Serialize)]
pub struct RatedResume {
    pub resume_id: String,
    pub filename: String,
    pub score: f64,
}

#[derive(Serialize)]
pub struct RateResponse {
    pub job_requirement: String,
    pub resume_count: usize,
    pub scores: Vec<RatedResume>,
}

#[derive(Serialize)]
pub struct TechListResponse {
    pub resumes: Vec<ResumeEntities>,
}

#[derive(Serialize)]
pub struct IdentityResponse {
    pub filename: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct TopicsQuery {
    pub n: Option<usize>,
}

#[derive(Serialize)]
pub struct TopicsResponse {
    pub topics: Vec<TopicSummary>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let engine = state.engine.clone();
    let response = run_blocking(move || {
        let engine = engine.read();
        Ok(ResumeListResponse {
            resumes: engine.stored().to_vec(),
            resume_count: engine.resume_count(),
            excluded: engine.excluded().to_vec(),
        })
    })
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/resumes/upload
///
/// Accepts any number of `files` parts. Every file must be a PDF or the whole
/// request is rejected. Duplicates are skipped, and files that cannot be read
/// or saved are reported as failed. Only files saved to the upload directory
/// enter the store, and the model is rebuilt once for them.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let uploads = read_files(multipart, "files").await?;
    if uploads.is_empty() {
        return Err(AppError::Validation("No files provided".to_string()));
    }

    let engine = state.engine.clone();
    let names: Vec<String> = uploads.iter().map(|(name, _)| name.clone()).collect();
    let already_stored: HashSet<String> = run_blocking(move || {
        let engine = engine.read();
        Ok(names.into_iter().filter(|n| engine.contains(n)).collect())
    })
    .await?;

    let mut skipped_files = Vec::new();
    let mut failed_files = Vec::new();
    let mut extracted: Vec<(String, String, Bytes)> = Vec::new();

    for (filename, data) in uploads {
        if already_stored.contains(&filename)
            || extracted.iter().any(|(name, _, _)| *name == filename)
        {
            skipped_files.push(filename);
            continue;
        }

        let extractor = state.extractor.clone();
        let bytes = data.clone();
        match run_blocking(move || extractor.extract(&bytes)).await {
            Ok(text) => extracted.push((filename, text, data)),
            Err(AppError::Extraction(reason)) => {
                warn!(filename, "upload failed extraction: {reason}");
                failed_files.push(FailedFile { filename, reason });
            }
            Err(e) => return Err(e),
        }
    }

    // Store check, file write and submit share one write lock. A file that
    // cannot be saved never reaches the store.
    let engine = state.engine.clone();
    let upload_dir = state.config.upload_dir.clone();
    let batch = run_blocking(move || {
        let mut engine = engine.write();
        let mut batch = SavedBatch::default();
        let mut documents = Vec::new();

        for (filename, text, data) in extracted {
            if engine.contains(&filename) {
                batch.skipped.push(filename);
                continue;
            }
            let path = upload_dir.join(&filename);
            match std::fs::write(&path, &data) {
                Ok(()) => documents.push((filename, text)),
                Err(e) => {
                    warn!(file = %path.display(), "failed to save upload: {e}");
                    batch.failed.push(FailedFile {
                        filename,
                        reason: "Failed to save file".to_string(),
                    });
                }
            }
        }

        for (filename, outcome) in engine.submit_documents(documents) {
            match outcome {
                SubmitOutcome::Accepted => batch.uploaded.push(filename),
                SubmitOutcome::Duplicate => batch.skipped.push(filename),
            }
        }
        batch.resume_count = engine.resume_count();
        Ok(batch)
    })
    .await?;

    skipped_files.extend(batch.skipped);
    failed_files.extend(batch.failed);
    let uploaded_files = batch.uploaded;

    info!(
        uploaded = uploaded_files.len(),
        skipped = skipped_files.len(),
        failed = failed_files.len(),
        "resume upload processed"
    );

    let status = if uploaded_files.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let message = if uploaded_files.is_empty() {
        "No new files uploaded".to_string()
    } else {
        format!("Uploaded {} file(s)", uploaded_files.len())
    };

    Ok((
        status,
        Json(UploadResponse {
            message,
            uploaded_files,
            skipped_files,
            failed_files,
            resume_count: batch.resume_count,
        }),
    ))
}

/// POST /api/v1/resumes/delete
///
/// Removes the resume from the store and its file from the upload directory.
/// A PDF that exists only on disk (never made it into the store) is still
/// deleted; 404 only when neither has it.
pub async fn handle_delete(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, AppError> {
    let raw = req
        .filename
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Filename is required".to_string()))?;
    let filename = sanitize_filename(&raw)
        .filter(|f| is_pdf(f))
        .ok_or_else(|| AppError::Validation("Only PDF files can be deleted".to_string()))?;

    let engine = state.engine.clone();
    let name = filename.clone();
    let (in_store, resume_count) = run_blocking(move || {
        let mut engine = engine.write();
        let in_store = match engine.remove_document(&name) {
            Ok(()) => true,
            Err(AppError::NotFound(_)) => false,
            Err(e) => return Err(e),
        };
        Ok((in_store, engine.resume_count()))
    })
    .await?;

    let path = state.config.upload_dir.join(&filename);
    let on_disk = match tokio::fs::remove_file(&path).await {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!(file = %path.display(), "failed to remove upload: {e}");
            false
        }
    };

    if !in_store && !on_disk {
        return Err(AppError::NotFound(format!("File '{filename}' not found")));
    }

    Ok(Json(DeleteResponse {
        message: format!("File '{filename}' deleted"),
        resume_count,
    }))
}

/// POST /api/v1/resumes/rate
pub async fn handle_rate(
    State(state): State<AppState>,
    Json(req): Json<RateRequest>,
) -> Result<Json<RateResponse>, AppError> {
    let job_requirement = req.job_requirement.unwrap_or_default();
    let engine = state.engine.clone();
    let job = job_requirement.clone();
    let (scores, resume_count) = run_blocking(move || {
        let engine = engine.read();
        Ok((engine.score_against(&job)?, engine.resume_count()))
    })
    .await?;

    Ok(Json(RateResponse {
        job_requirement,
        resume_count,
        scores: scores
            .into_iter()
            .enumerate()
            .map(|(i, s)| RatedResume {
                resume_id: format!("Resume {}", i + 1),
                filename: s.filename,
                score: round2(s.score),
            })
            .collect(),
    }))
}

/// GET /api/v1/resumes/tech
pub async fn handle_tech_all(
    State(state): State<AppState>,
) -> Result<Json<TechListResponse>, AppError> {
    let engine = state.engine.clone();
    let resumes = run_blocking(move || engine.read().extract_all_entities()).await?;
    Ok(Json(TechListResponse { resumes }))
}

/// GET /api/v1/resumes/:filename/tech
pub async fn handle_tech_one(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<ResumeEntities>, AppError> {
    let engine = state.engine.clone();
    let name = filename.clone();
    let tech_entities = run_blocking(move || engine.read().extract_entities(&name)).await?;
    Ok(Json(ResumeEntities {
        filename,
        tech_entities,
    }))
}

/// GET /api/v1/resumes/:filename/identity
pub async fn handle_identity(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<IdentityResponse>, AppError> {
    let engine = state.engine.clone();
    let name = filename.clone();
    let identity = run_blocking(move || engine.read().extract_identity(&name)).await?;
    Ok(Json(IdentityResponse {
        filename,
        name: identity.name,
        email: identity.email,
    }))
}

/// GET /api/v1/topics
pub async fn handle_topics(
    State(state): State<AppState>,
    Query(params): Query<TopicsQuery>,
) -> Result<Json<TopicsResponse>, AppError> {
    let n = params.n.unwrap_or(DEFAULT_TOPIC_TERMS);
    let engine = state.engine.clone();
    let topics = run_blocking(move || engine.read().topics(n)).await?;
    Ok(Json(TopicsResponse { topics }))
}

/// POST /api/v1/ats
pub async fn handle_ats(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AtsReport>, AppError> {
    let (_, data) = read_files(multipart, "file")
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let extractor = state.extractor.clone();
    let text = run_blocking(move || extractor.extract(&data)).await?;
    Ok(Json(ats::analyze(&text)))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Collects every multipart part named `field_name` as (sanitised filename, bytes).
/// Any part that is not a PDF rejects the request.
async fn read_files(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<Vec<(String, Bytes)>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        let raw_name = field.file_name().unwrap_or_default().to_string();
        let filename = sanitize_filename(&raw_name)
            .ok_or_else(|| AppError::Validation("File name is missing".to_string()))?;
        if !is_pdf(&filename) {
            return Err(AppError::Validation(format!(
                "Invalid file type for '{filename}': only PDF files are allowed"
            )));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{filename}': {e}")))?;
        files.push((filename, data));
    }
    Ok(files)
}

/// Runs CPU-bound engine or extraction work off the async executor.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed: {e}")))?
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
