//! HTML views. Templates live in `templates/`; askama escapes all values.

use askama::Template;

use crate::diff::{diff_text, DiffSegment, DiffSummary, Granularity};
use crate::errors::{AppError, SERVICE_UNAVAILABLE_MESSAGE};
use crate::llm_client::MODEL;
use crate::page::session::{Notice, SessionState};
use crate::tailoring::prompts::TailoringLevel;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    resume_text: &'a str,
    diff_base: &'a str,
    tailored_from: Option<&'a str>,
    job_description: &'a str,
    level_deep: bool,
    include_cover_letter: bool,
    granularity_line: bool,
    tailored_resume: Option<&'a str>,
    cover_letter: Option<&'a str>,
    segments: Vec<DiffSegment>,
    summary: DiffSummary,
    notice: Option<&'a Notice>,
    model: &'static str,
}

#[derive(Template)]
#[template(path = "unavailable.html")]
struct UnavailableTemplate {
    message: &'static str,
}

/// Full redraw of the page for the given session.
pub fn render_page(state: &SessionState, notice: Option<&Notice>) -> Result<String, AppError> {
    let segments = state
        .tailored_resume
        .as_deref()
        .map(|tailored| diff_text(state.diff_base(), tailored, state.granularity))
        .unwrap_or_default();
    let summary = DiffSummary::of(&segments);

    IndexTemplate {
        resume_text: &state.resume_text,
        diff_base: state.diff_base(),
        tailored_from: state.tailored_from.as_deref(),
        job_description: &state.job_description,
        level_deep: state.level == TailoringLevel::Deep,
        include_cover_letter: state.include_cover_letter,
        granularity_line: state.granularity == Granularity::Line,
        tailored_resume: state.tailored_resume.as_deref(),
        cover_letter: state.cover_letter.as_deref(),
        segments,
        summary,
        notice,
        model: MODEL,
    }
    .render()
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to render page: {e}")))
}

pub fn render_unavailable() -> Result<String, AppError> {
    UnavailableTemplate {
        message: SERVICE_UNAVAILABLE_MESSAGE,
    }
    .render()
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to render page: {e}")))
}
