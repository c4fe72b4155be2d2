//! Axum route handlers for the HTML page.

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::export::{render_pdf, DocumentKind};
use crate::extract::extract_text;
use crate::page::form::{read_submission, Upload};
use crate::page::session::{apply, Notice, SessionState};
use crate::page::view::{render_page, render_unavailable};
use crate::state::AppState;

type PageResponse = Result<(StatusCode, Html<String>), AppError>;

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub kind: DocumentKind,
    pub text: String,
}

fn unavailable() -> PageResponse {
    Ok((StatusCode::SERVICE_UNAVAILABLE, Html(render_unavailable()?)))
}

fn status_for(notice: Option<&Notice>) -> StatusCode {
    match notice {
        Some(Notice::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(Notice::GenerationFailed) => StatusCode::BAD_GATEWAY,
        Some(Notice::Success(_)) | None => StatusCode::OK,
    }
}

fn page(state: &SessionState, notice: Option<&Notice>) -> PageResponse {
    Ok((status_for(notice), Html(render_page(state, notice)?)))
}

/// GET /
///
/// A fresh session: empty form, nothing generated.
pub async fn handle_index(State(state): State<AppState>) -> PageResponse {
    if !state.is_available() {
        return unavailable();
    }
    page(&SessionState::default(), None)
}

/// POST /
///
/// One user interaction: decode the session from the form, fold in uploads,
/// apply the action and redraw.
pub async fn handle_submit(State(state): State<AppState>, multipart: Multipart) -> PageResponse {
    let Some(llm) = state.llm.clone() else {
        return unavailable();
    };

    let submission = read_submission(multipart).await?;
    let mut session = submission.state;

    if let Err(notice) = apply_uploads(
        &mut session,
        submission.resume_upload,
        submission.jd_upload,
    )
    .await?
    {
        return page(&session, Some(&notice));
    }

    info!("Page action {:?}", submission.action);
    let outcome = apply(session, submission.action, llm.as_ref()).await;

    page(&outcome.state, outcome.notice.as_ref())
}

/// Replaces text fields with the content of uploaded files.
/// The outer error is an internal failure; the inner one is shown inline.
async fn apply_uploads(
    session: &mut SessionState,
    resume_upload: Option<Upload>,
    jd_upload: Option<Upload>,
) -> Result<Result<(), Notice>, AppError> {
    if let Some(upload) = resume_upload {
        match extract_upload(upload).await? {
            Ok(text) => session.resume_text = text,
            Err(notice) => return Ok(Err(notice)),
        }
    }
    if let Some(upload) = jd_upload {
        match extract_upload(upload).await? {
            Ok(text) => session.job_description = text,
            Err(notice) => return Ok(Err(notice)),
        }
    }
    Ok(Ok(()))
}

async fn extract_upload(upload: Upload) -> Result<Result<String, Notice>, AppError> {
    let file_name = upload.file_name.clone();
    let result = tokio::task::spawn_blocking(move || extract_text(&upload.file_name, &upload.data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")))?;

    Ok(result.map_err(|e| {
        warn!("Upload extraction failed for {file_name}: {e}");
        Notice::Invalid(e.to_string())
    }))
}

/// POST /download
///
/// Renders the submitted document as a PDF attachment.
pub async fn handle_download(
    State(state): State<AppState>,
    Form(request): Form<DownloadRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !state.is_available() {
        return Err(AppError::ServiceUnavailable);
    }

    let kind = request.kind;
    let bytes = tokio::task::spawn_blocking(move || render_pdf(&request.text, kind))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF task failed: {e}")))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", kind.file_name()),
            ),
        ],
        bytes,
    ))
}
