//! Axum route handlers for both front ends.
//!
//! The form page and the live page's JSON API read the same multipart fields
//! (`job_description`, repeated `resumes` files) and run the same pipeline; they
//! differ only in how the result is rendered.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::errors::AppError;
use crate::screening::document::Document;
use crate::screening::export::{read_results, write_results, RESULTS_FILE};
use crate::screening::pages::{render_index, render_live, render_results};
use crate::screening::pipeline::{analyze, Analysis};
use crate::state::AppState;

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const RESUMES_FIELD: &str = "resumes";

/// Fields of one submitted screening form.
#[derive(Debug, Default)]
pub struct ScreeningUpload {
    pub job_description: String,
    pub documents: Vec<Document>,
}

/// Reads the multipart body. File parts with an empty filename (an empty file
/// input) are skipped.
pub async fn read_upload(mut multipart: Multipart) -> Result<ScreeningUpload, AppError> {
    let mut upload = ScreeningUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(JOB_DESCRIPTION_FIELD) => {
                upload.job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable job description: {e}")))?;
            }
            Some(RESUMES_FIELD) => {
                let filename = field.file_name().map(base_name).unwrap_or_default();
                if filename.is_empty() {
                    continue;
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read '{filename}': {e}")))?;
                upload.documents.push(Document::new(filename, data));
            }
            _ => {}
        }
    }

    Ok(upload)
}

/// Strips any client-side directory components from an uploaded filename.
fn base_name(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Runs the pipeline off the async executor and refreshes the CSV export.
/// A failed export is logged; the ranked results are still returned.
pub async fn run_screening(state: &AppState, upload: ScreeningUpload) -> Result<Analysis, AppError> {
    let embedder = state.embedder.clone();
    let vocabulary = state.vocabulary.clone();
    let export_dir = state.config.export_dir.clone();

    tokio::task::spawn_blocking(move || -> Result<Analysis, AppError> {
        let analysis = analyze(
            embedder.as_ref(),
            &vocabulary,
            &upload.job_description,
            upload.documents,
        )?;
        if let Err(e) = write_results(&export_dir, &analysis.results) {
            warn!(
                run_id = %analysis.run_id,
                "Could not write {RESULTS_FILE} to {}: {e}",
                export_dir.display()
            );
        }
        Ok(analysis)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in screening: {e}")))?
}

fn render_page(rendered: Result<String, tera::Error>) -> Result<Html<String>, AppError> {
    rendered
        .map(Html)
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("template rendering failed")))
}

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render_page(render_index(&state.templates, None))
}

/// POST /
///
/// Form submission. Renders the ranked table, or the form again with the error.
pub async fn handle_form_submit(State(state): State<AppState>, multipart: Multipart) -> Response {
    let result = match read_upload(multipart).await {
        Ok(upload) => run_screening(&state, upload).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(analysis) => render_page(render_results(&state.templates, &analysis)).into_response(),
        Err(e) => {
            let (status, _) = e.status_and_code();
            match render_page(render_index(&state.templates, Some(&e.public_message()))) {
                Ok(page) => (status, page).into_response(),
                Err(render_err) => render_err.into_response(),
            }
        }
    }
}

/// GET /live
pub async fn handle_live_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render_page(render_live(&state.templates))
}

/// POST /api/v1/screenings
///
/// JSON variant used by the live page.
pub async fn handle_screening_api(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Analysis>, AppError> {
    let upload = read_upload(multipart).await?;
    let analysis = run_screening(&state, upload).await?;
    Ok(Json(analysis))
}

/// GET /download
///
/// Latest `results.csv` as an attachment.
pub async fn handle_download(State(state): State<AppState>) -> Result<Response, AppError> {
    let export_dir = state.config.export_dir.clone();
    let bytes = tokio::task::spawn_blocking(move || read_results(&export_dir))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in download: {e}")))?
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("No results yet. Run an analysis first.".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{RESULTS_FILE}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_strips_directories() {
        assert_eq!(base_name("C:\\Users\\me\\cv.pdf"), "cv.pdf");
        assert_eq!(base_name("../../etc/cv.txt"), "cv.txt");
        assert_eq!(base_name("plain.txt"), "plain.txt");
        assert_eq!(base_name(""), "");
    }
}
