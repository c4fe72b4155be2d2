//! Multipart form decoding for the page.
//!
//! Field names are shared with `templates/index.html`.

use axum::extract::Multipart;
use bytes::Bytes;

use crate::diff::Granularity;
use crate::errors::AppError;
use crate::page::session::{Action, SessionState};
use crate::tailoring::prompts::TailoringLevel;

/// A file picked in one of the upload controls.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct PageSubmission {
    pub state: SessionState,
    pub action: Action,
    pub resume_upload: Option<Upload>,
    pub jd_upload: Option<Upload>,
}

/// Reads every form field. Unknown fields are ignored; browsers send an
/// empty file part when no file was chosen, which counts as no upload.
pub async fn read_submission(mut multipart: Multipart) -> Result<PageSubmission, AppError> {
    let mut state = SessionState::default();
    let mut action = Action::Submit;
    let mut resume_upload = None;
    let mut jd_upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed form submission: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "resume_file" | "jd_file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                if file_name.is_empty() || data.is_empty() {
                    continue;
                }
                let upload = Some(Upload { file_name, data });
                if name == "resume_file" {
                    resume_upload = upload;
                } else {
                    jd_upload = upload;
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read field {name}: {e}")))?;
                apply_text_field(&mut state, &mut action, &name, value);
            }
        }
    }

    Ok(PageSubmission {
        state,
        action,
        resume_upload,
        jd_upload,
    })
}

fn apply_text_field(state: &mut SessionState, action: &mut Action, name: &str, value: String) {
    match name {
        "resume_text" => state.resume_text = normalize_newlines(value),
        "job_description" => state.job_description = normalize_newlines(value),
        "level" => state.level = TailoringLevel::parse(&value),
        "include_cover_letter" => state.include_cover_letter = is_checked(&value),
        "granularity" => state.granularity = Granularity::parse(&value),
        "tailored_resume" => state.tailored_resume = non_empty(normalize_newlines(value)),
        "tailored_from" => state.tailored_from = non_empty(normalize_newlines(value)),
        "cover_letter" => state.cover_letter = non_empty(normalize_newlines(value)),
        "action" => *action = Action::parse(&value),
        _ => {}
    }
}

/// Browsers submit textarea content with CRLF line breaks.
fn normalize_newlines(value: String) -> String {
    if value.contains('\r') {
        value.replace("\r\n", "\n")
    } else {
        value
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn is_checked(value: &str) -> bool {
    matches!(value.trim(), "on" | "true" | "1")
}
