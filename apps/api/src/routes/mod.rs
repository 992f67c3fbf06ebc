pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume corpus
        .route("/api/v1/resumes", get(handlers::handle_list_resumes))
        .route("/api/v1/resumes/upload", post(handlers::handle_upload))
        .route("/api/v1/resumes/delete", post(handlers::handle_delete))
        .route("/api/v1/resumes/rate", post(handlers::handle_rate))
        .route("/api/v1/resumes/tech", get(handlers::handle_tech_all))
        .route(
            "/api/v1/resumes/:filename/tech",
            get(handlers::handle_tech_one),
        )
        .route(
            "/api/v1/resumes/:filename/identity",
            get(handlers::handle_identity),
        )
        .route("/api/v1/topics", get(handlers::handle_topics))
        // Single-resume ATS check
        .route("/api/v1/ats", post(handlers::handle_ats))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use parking_lot::RwLock;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::errors::AppError;
    use crate::extraction::extractor::TextExtractor;
    use crate::nlp::NlpPipeline;
    use crate::ranking::engine::RankingEngine;

    const BOUNDARY: &str = "resume-ranker-test-boundary";

    const ALICE: &str = "Alice Johnson alice@example.com Senior Python developer. \
        Built data pipelines with SQL, Docker and Kubernetes at Acme Corp. \
        Python machine learning, pandas, PostgreSQL.";
    const BOB: &str = "Bob Smith bob@example.com Frontend engineer. \
        React, TypeScript, JavaScript and CSS for web applications. \
        Designed user interfaces and component libraries.";

    /// Treats uploads as UTF-8 text; bodies starting with `CORRUPT` fail.
    struct PlainTextExtractor;

    impl TextExtractor for PlainTextExtractor {
        fn extract(&self, bytes: &[u8]) -> Result<String, AppError> {
            let text = String::from_utf8(bytes.to_vec())
                .map_err(|_| AppError::Extraction("Failed to read PDF: not text".to_string()))?;
            if text.starts_with("CORRUPT") {
                return Err(AppError::Extraction(
                    "Failed to read PDF: malformed document".to_string(),
                ));
            }
            Ok(text)
        }
    }

    fn test_app() -> (Router, AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.upload_dir = dir.path().to_path_buf();
        let engine = RankingEngine::new(Arc::new(NlpPipeline::default()), config.lda_params());
        let state = AppState {
            engine: Arc::new(RwLock::new(engine)),
            extractor: Arc::new(PlainTextExtractor),
            config,
        };
        (build_router(state.clone()), state, dir)
    }

    fn multipart_request(uri: &str, field: &str, files: &[(&str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, content) in files {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\nContent-Type: application/pdf\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn upload_two(app: &Router) {
        let (status, _) = send(
            app,
            multipart_request(
                "/api/v1/resumes/upload",
                "files",
                &[("alice.pdf", ALICE), ("bob.pdf", BOB)],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _, _dir) = test_app();
        let (status, body) = send(&app, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["resume_count"], 0);
    }

    #[tokio::test]
    async fn test_rate_without_resumes_is_no_corpus() {
        let (app, _, _dir) = test_app();
        let (status, body) = send(
            &app,
            json_request(
                "/api/v1/resumes/rate",
                serde_json::json!({"job_requirement": "python developer"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "NO_CORPUS");
    }

    #[tokio::test]
    async fn test_rate_with_empty_requirement_is_validation_error() {
        let (app, _, _dir) = test_app();
        let (status, body) = send(
            &app,
            json_request(
                "/api/v1/resumes/rate",
                serde_json::json!({"job_requirement": "   "}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let (app, state, _dir) = test_app();
        let (status, body) = send(
            &app,
            multipart_request("/api/v1/resumes/upload", "files", &[("cv.docx", ALICE)]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(state.engine.read().stored().len(), 0);
    }

    #[tokio::test]
    async fn test_upload_without_files_is_validation_error() {
        let (app, _, _dir) = test_app();
        let (status, _) = send(
            &app,
            multipart_request("/api/v1/resumes/upload", "files", &[]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_then_duplicate_is_skipped() {
        let (app, state, dir) = test_app();
        upload_two(&app).await;
        assert!(dir.path().join("alice.pdf").is_file());
        assert_eq!(state.engine.read().resume_count(), 2);

        let (status, body) = send(
            &app,
            multipart_request("/api/v1/resumes/upload", "files", &[("alice.pdf", ALICE)]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skipped_files"], serde_json::json!(["alice.pdf"]));
        assert_eq!(body["resume_count"], 2);
    }

    #[tokio::test]
    async fn test_corrupt_upload_is_reported_and_batch_continues() {
        let (app, _, dir) = test_app();
        let (status, body) = send(
            &app,
            multipart_request(
                "/api/v1/resumes/upload",
                "files",
                &[("broken.pdf", "CORRUPT bytes"), ("alice.pdf", ALICE)],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["uploaded_files"], serde_json::json!(["alice.pdf"]));
        assert_eq!(body["failed_files"][0]["filename"], "broken.pdf");
        assert!(!dir.path().join("broken.pdf").exists());
    }

    #[tokio::test]
    async fn test_rate_returns_bounded_scores_in_order() {
        let (app, _, _dir) = test_app();
        upload_two(&app).await;

        let (status, body) = send(
            &app,
            json_request(
                "/api/v1/resumes/rate",
                serde_json::json!({"job_requirement": "Python developer with SQL and Docker"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_requirement"], "Python developer with SQL and Docker");
        assert_eq!(body["resume_count"], 2);
        let scores = body["scores"].as_array().unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0]["resume_id"], "Resume 1");
        assert_eq!(scores[0]["filename"], "alice.pdf");
        assert_eq!(scores[1]["resume_id"], "Resume 2");
        for s in scores {
            let score = s["score"].as_f64().unwrap();
            assert!((0.0..=10.0).contains(&score));
        }
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (app, _, _dir) = test_app();
        let (status, body) = send(
            &app,
            json_request(
                "/api/v1/resumes/delete",
                serde_json::json!({"filename": "ghost.pdf"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_requires_filename() {
        let (app, _, _dir) = test_app();
        let (status, _) = send(
            &app,
            json_request("/api/v1/resumes/delete", serde_json::json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_removes_resume_and_file() {
        let (app, state, dir) = test_app();
        upload_two(&app).await;

        let (status, body) = send(
            &app,
            json_request(
                "/api/v1/resumes/delete",
                serde_json::json!({"filename": "alice.pdf"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume_count"], 1);
        assert!(!dir.path().join("alice.pdf").exists());
        assert!(!state.engine.read().contains("alice.pdf"));
    }

    #[tokio::test]
    async fn test_tech_and_identity() {
        let (app, _, _dir) = test_app();
        upload_two(&app).await;

        let (status, body) = send(&app, get_request("/api/v1/resumes/alice.pdf/tech")).await;
        assert_eq!(status, StatusCode::OK);
        let tech: Vec<&str> = body["tech_entities"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(tech.contains(&"Python"));
        assert!(tech.contains(&"Docker"));

        let (status, body) = send(&app, get_request("/api/v1/resumes/tech")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resumes"].as_array().unwrap().len(), 2);

        let (status, body) = send(&app, get_request("/api/v1/resumes/alice.pdf/identity")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "alice@example.com");

        let (status, _) = send(&app, get_request("/api/v1/resumes/ghost.pdf/tech")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_and_topics() {
        let (app, _, _dir) = test_app();
        upload_two(&app).await;

        let (status, body) = send(&app, get_request("/api/v1/resumes")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resumes"].as_array().unwrap().len(), 2);
        assert_eq!(body["resume_count"], 2);

        let (status, body) = send(&app, get_request("/api/v1/topics?n=3")).await;
        assert_eq!(status, StatusCode::OK);
        let topics = body["topics"].as_array().unwrap();
        assert_eq!(topics.len(), 3);
        assert!(topics[0]["terms"].as_array().unwrap().len() <= 3);
    }

    #[tokio::test]
    async fn test_ats_report() {
        let (app, _, _dir) = test_app();
        let (status, body) = send(
            &app,
            multipart_request("/api/v1/ats", "file", &[("alice.pdf", ALICE)]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let total = body["total_score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&total));

        let (status, body) = send(
            &app,
            multipart_request("/api/v1/ats", "file", &[("broken.pdf", "CORRUPT")]),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EXTRACTION_FAILED");
    }

    #[tokio::test]
    async fn test_upload_that_cannot_be_saved_leaves_store_untouched() {
        let (_, mut state, dir) = test_app();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        state.config.upload_dir = blocker.join("uploads");
        let app = build_router(state.clone());

        let (status, body) = send(
            &app,
            multipart_request(
                "/api/v1/resumes/upload",
                "files",
                &[("alice.pdf", ALICE), ("bob.pdf", BOB)],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["uploaded_files"], serde_json::json!([]));
        assert_eq!(body["failed_files"].as_array().unwrap().len(), 2);
        assert_eq!(body["resume_count"], 0);
        assert!(state.engine.read().stored().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_file_missing_from_store() {
        let (app, state, dir) = test_app();
        let stray = dir.path().join("stray.pdf");
        std::fs::write(&stray, "CORRUPT leftover").unwrap();

        let (status, body) = send(
            &app,
            json_request(
                "/api/v1/resumes/delete",
                serde_json::json!({"filename": "stray.pdf"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume_count"], 0);
        assert!(!stray.exists());
        assert!(!state.engine.read().contains("stray.pdf"));
    }
}
