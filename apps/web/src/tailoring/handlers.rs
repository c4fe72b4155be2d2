//! Axum route handlers for the JSON API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::{diff_text, DiffSegment, DiffSummary, Granularity};
use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::form::validate;
use crate::tailoring::generator::{draft_cover_letter, tailor_documents};
use crate::tailoring::prompts::TailoringLevel;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub resume_text: String,
    pub jd_text: String,
    #[serde(default)]
    pub level: TailoringLevel,
    #[serde(default)]
    pub include_cover_letter: bool,
    #[serde(default)]
    pub granularity: Granularity,
}

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub tailored_resume: String,
    pub cover_letter: Option<String>,
    pub diff: Vec<DiffSegment>,
    pub summary: DiffSummary,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub resume_text: String,
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct DiffRequest {
    pub original: String,
    pub revised: String,
    #[serde(default)]
    pub granularity: Granularity,
}

#[derive(Debug, Serialize)]
pub struct DiffResponse {
    pub segments: Vec<DiffSegment>,
    pub summary: DiffSummary,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tailor
///
/// Tailored resume (plus cover letter when asked) and its diff against the input.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    let llm = state.llm()?;
    let input = validate(&request.resume_text, &request.jd_text)?;

    let docs = tailor_documents(llm, &input, request.level, request.include_cover_letter).await?;

    let diff = diff_text(&input.resume, &docs.tailored_resume, request.granularity);
    let summary = DiffSummary::of(&diff);

    Ok(Json(TailorResponse {
        tailored_resume: docs.tailored_resume,
        cover_letter: docs.cover_letter,
        diff,
        summary,
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let llm = state.llm()?;
    let input = validate(&request.resume_text, &request.jd_text)?;

    let cover_letter = draft_cover_letter(llm, &input).await?;

    Ok(Json(CoverLetterResponse {
        cover_letter,
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/diff
///
/// Pure text diff; works without a credential.
pub async fn handle_diff(Json(request): Json<DiffRequest>) -> Json<DiffResponse> {
    let segments = diff_text(&request.original, &request.revised, request.granularity);
    let summary = DiffSummary::of(&segments);
    Json(DiffResponse { segments, summary })
}
