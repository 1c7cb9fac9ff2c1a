pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Form front end
        .route(
            "/",
            get(handlers::handle_index).post(handlers::handle_form_submit),
        )
        .route("/download", get(handlers::handle_download))
        // Live front end
        .route("/live", get(handlers::handle_live_page))
        .route("/api/v1/screenings", post(handlers::handle_screening_api))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::{Config, EmbeddingBackend, EmbeddingConfig};
    use crate::screening::embedder::HashEmbedder;
    use crate::screening::keywords::default_vocabulary;

    const BOUNDARY: &str = "screener-test-boundary";
    const JOB: &str = "Looking for a Python developer with SQL and Cloud experience";

    fn test_app(export_dir: &Path) -> Router {
        build_router(test_state(export_dir))
    }

    fn test_state(export_dir: &Path) -> AppState {
        let config = Config {
            port: 0,
            rust_log: "debug".to_string(),
            embedding: EmbeddingConfig {
                backend: EmbeddingBackend::Hash,
                dimension: 384,
                cache_dir: ".fastembed_cache".into(),
            },
            vocabulary: default_vocabulary(),
            export_dir: export_dir.to_path_buf(),
            max_upload_bytes: 1024 * 1024,
        };
        AppState::new(config, Arc::new(HashEmbedder::new(384))).unwrap()
    }

    fn multipart_body(job: Option<&str>, files: &[(&str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(job) = job {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_description\"\r\n\r\n{job}\r\n"
                )
                .as_bytes(),
            );
        }
        for (name, data) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resumes\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_embedder() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .oneshot(get_request("/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["embedder"], "hash");
    }

    #[tokio::test]
    async fn test_pages_render() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        for uri in ["/", "/live"] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            let html = String::from_utf8(body_bytes(response).await).unwrap();
            assert!(html.contains("Resume Screener"), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_api_ranks_resumes_and_exports_csv() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let body = multipart_body(
            Some(JOB),
            &[
                ("chef.txt", "Experienced chef specializing in French cuisine"),
                ("dev.txt", "Python developer: Python, Flask, SQL, Cloud"),
            ],
        );
        let response = app
            .clone()
            .oneshot(upload_request("/api/v1/screenings", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["resume_name"], "dev.txt");
        assert_eq!(
            results[0]["matched_keywords"],
            serde_json::json!(["Python", "Flask", "SQL", "Cloud"])
        );
        assert_eq!(results[1]["resume_name"], "chef.txt");
        assert!(json["rejected"].as_array().unwrap().is_empty());
        assert!(json["run_id"].is_string());

        let download = app.oneshot(get_request("/download")).await.unwrap();
        assert_eq!(download.status(), StatusCode::OK);
        assert_eq!(
            download.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"results.csv\""
        );
        let csv = String::from_utf8(body_bytes(download).await).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Resume,Score,Top Skills");
        assert!(lines[1].starts_with("dev.txt,"));
        assert!(lines[2].starts_with("chef.txt,"));
    }

    #[tokio::test]
    async fn test_results_survive_unwritable_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the export directory should be makes every write fail.
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let app = test_app(&blocker.join("exports"));

        let body = multipart_body(Some(JOB), &[("dev.txt", "Python developer with SQL")]);
        let response = app
            .clone()
            .oneshot(upload_request("/api/v1/screenings", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["results"][0]["resume_name"], "dev.txt");

        let body = multipart_body(Some(JOB), &[("dev.txt", "Python developer with SQL")]);
        let response = app.oneshot(upload_request("/", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("<td>dev.txt</td>"));
        assert!(!blocker.join("exports").exists());
    }

    #[tokio::test]
    async fn test_api_reports_unreadable_documents() {
        let dir = tempfile::tempdir().unwrap();
        let body = multipart_body(
            Some(JOB),
            &[
                ("broken.pdf", "definitely not a pdf"),
                ("dev.txt", "SQL and Python"),
            ],
        );
        let response = test_app(dir.path())
            .oneshot(upload_request("/api/v1/screenings", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["results"].as_array().unwrap().len(), 1);
        assert_eq!(json["results"][0]["resume_name"], "dev.txt");
        assert_eq!(json["rejected"][0]["name"], "broken.pdf");
    }

    #[tokio::test]
    async fn test_api_empty_job_description_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let body = multipart_body(Some(""), &[("dev.txt", "Python")]);
        let response = test_app(dir.path())
            .oneshot(upload_request("/api/v1/screenings", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "MISSING_INPUT");
        assert_eq!(json["error"]["message"], "Please provide a job description");
        assert!(!dir.path().join("results.csv").exists());
    }

    #[tokio::test]
    async fn test_api_empty_filename_counts_as_no_upload() {
        let dir = tempfile::tempdir().unwrap();
        let body = multipart_body(Some(JOB), &[("", "")]);
        let response = test_app(dir.path())
            .oneshot(upload_request("/api/v1/screenings", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "No resumes uploaded");
    }

    #[tokio::test]
    async fn test_form_submit_renders_results_table() {
        let dir = tempfile::tempdir().unwrap();
        let body = multipart_body(
            Some(JOB),
            &[
                ("a.txt", "Data analyst with SQL and Git"),
                ("b.txt", "Data analyst with SQL and Git"),
            ],
        );
        let response = test_app(dir.path())
            .oneshot(upload_request("/", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = String::from_utf8(body_bytes(response).await).unwrap();
        let a = html.find("<td>a.txt</td>").unwrap();
        let b = html.find("<td>b.txt</td>").unwrap();
        assert!(a < b, "tied resumes must keep upload order");
        assert!(html.contains("SQL, Data, Git"));
    }

    #[tokio::test]
    async fn test_form_submit_without_job_description_shows_message() {
        let dir = tempfile::tempdir().unwrap();
        let body = multipart_body(None, &[("a.txt", "Python")]);
        let response = test_app(dir.path())
            .oneshot(upload_request("/", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("Please provide a job description"));
    }

    #[tokio::test]
    async fn test_download_before_any_run_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .oneshot(get_request("/download"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
