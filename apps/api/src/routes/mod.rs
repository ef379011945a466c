pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::applications::handlers as applications;
use crate::bulk::handlers::{self as bulk, MAX_BULK_FILES};
use crate::dashboard::handle_dashboard;
use crate::jobs::handlers as jobs;
use crate::matching::handlers::handle_match_preview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let bulk_body_limit = state.config.max_upload_bytes.saturating_mul(MAX_BULK_FILES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route(
            "/api/v1/users",
            post(accounts::handle_register).get(accounts::handle_find_user),
        )
        .route("/api/v1/users/:id", get(accounts::handle_get_user))
        .route("/api/v1/users/:id/dashboard", get(handle_dashboard))
        .route(
            "/api/v1/users/:id/applications",
            get(applications::handle_user_applications),
        )
        // Jobs
        .route(
            "/api/v1/jobs",
            post(jobs::handle_post_job).get(jobs::handle_browse_jobs),
        )
        .route("/api/v1/jobs/facets", get(jobs::handle_job_facets))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route(
            "/api/v1/jobs/:id/applications",
            get(applications::handle_job_applications).post(applications::handle_apply),
        )
        .route("/api/v1/employers/:id/jobs", get(jobs::handle_employer_jobs))
        .route(
            "/api/v1/employers/:id/applications",
            get(applications::handle_employer_applications),
        )
        // Applications
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        // Bulk analysis
        .route(
            "/api/v1/jobs/:id/bulk",
            post(bulk::handle_bulk_analysis).layer(DefaultBodyLimit::max(bulk_body_limit)),
        )
        .route("/api/v1/bulk/:batch_id", get(bulk::handle_get_batch))
        .route(
            "/api/v1/bulk/:batch_id/items/:index/save",
            post(bulk::handle_save_item),
        )
        // Matching
        .route("/api/v1/match/preview", post(handle_match_preview))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use aws_sdk_s3::config::{BehaviorVersion, Region};
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::bulk::cache::BatchCache;
    use crate::config::Config;
    use crate::matching::testing::ScriptedGenerator;

    // Nothing here reaches the database, Redis or S3: every request is rejected
    // by validation before any I/O.
    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/hr_match_test".to_string(),
            redis_url: "redis://127.0.0.1/".to_string(),
            s3_bucket: "resumes".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            anthropic_api_key: "test".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            bulk_item_delay: Duration::ZERO,
            bulk_result_ttl: Duration::from_secs(60),
            max_upload_bytes: 1024,
        };
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let redis = redis::Client::open(config.redis_url.as_str()).unwrap();
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();

        AppState {
            db,
            batches: BatchCache::new(redis, config.bulk_result_ttl),
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            generator: Arc::new(ScriptedGenerator::new("Rust", "Dev.", "70\nok")),
            config,
        }
    }

    async fn send(method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        dispatch(request).await
    }

    const BOUNDARY: &str = "hr-match-test-boundary";

    fn multipart_body(employer_id: Option<Uuid>, files: &[(String, Vec<u8>)]) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(id) = employer_id {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"employer_id\"\r\n\r\n{id}\r\n"
                )
                .as_bytes(),
            );
        }
        for (name, data) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resumes\"; filename=\"{name}\"\r\n\
                     Content-Type: text/plain\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn send_bulk(employer_id: Option<Uuid>, files: &[(String, Vec<u8>)]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/v1/jobs/{}/bulk", Uuid::new_v4()))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(employer_id, files)))
            .unwrap();
        dispatch(request).await
    }

    fn resumes(count: usize, size: usize) -> Vec<(String, Vec<u8>)> {
        (0..count)
            .map(|i| (format!("candidate_{i}.txt"), vec![b'a'; size]))
            .collect()
    }

    async fn dispatch(request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "hr-match-api");
    }

    #[tokio::test]
    async fn test_register_with_missing_fields_is_bad_request() {
        let (status, body) = send(
            Method::POST,
            "/api/v1/users",
            Some(r#"{"username": "", "password": "x", "email": "a@b.io"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_apply_with_blank_resume_is_bad_request() {
        let uri = format!("/api/v1/jobs/{}/applications", Uuid::new_v4());
        let payload = format!(r#"{{"user_id": "{}", "resume_text": "   "}}"#, Uuid::new_v4());
        let (status, body) = send(Method::POST, &uri, Some(&payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("resume"));
    }

    #[tokio::test]
    async fn test_match_preview_with_empty_resume_is_bad_request() {
        let payload = format!(r#"{{"job_id": "{}", "resume_text": ""}}"#, Uuid::new_v4());
        let (status, _) = send(Method::POST, "/api/v1/match/preview", Some(&payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_status_is_bad_request() {
        let uri = format!("/api/v1/applications/{}/status", Uuid::new_v4());
        let (status, body) = send(Method::PATCH, &uri, Some(r#"{"status": "Hired"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("Hired"));
    }

    #[tokio::test]
    async fn test_employer_applications_unknown_status_filter() {
        let uri = format!(
            "/api/v1/employers/{}/applications?status=Shortlisted",
            Uuid::new_v4()
        );
        let (status, _) = send(Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (status, _) = send(Method::GET, "/api/v1/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bulk_upload_over_body_limit_is_payload_too_large() {
        // Limit is 1024 bytes per file times MAX_BULK_FILES.
        let (status, body) = send_bulk(Some(Uuid::new_v4()), &resumes(3, 30 * 1024)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_bulk_upload_caps_file_count() {
        let (status, body) =
            send_bulk(Some(Uuid::new_v4()), &resumes(MAX_BULK_FILES + 1, 8)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("At most 50 resumes"));
    }

    #[tokio::test]
    async fn test_bulk_upload_requires_employer_id() {
        let (status, body) = send_bulk(None, &resumes(1, 8)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "employer_id is required");
    }

    #[tokio::test]
    async fn test_bulk_upload_requires_a_resume() {
        let (status, body) = send_bulk(Some(Uuid::new_v4()), &[]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("at least one resume"));
    }
}
