//! Tailoring pipeline: one completion call per generated document.
//!
//! Flow: validated input → build_prompt → CompletionClient::complete → text.
//! No retries here: a failure is reported once and the user resubmits.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::CompletionClient;
use crate::tailoring::form::ValidatedInput;
use crate::tailoring::prompts::{build_prompt, OutputKind, TailoringLevel};

/// Both documents produced by a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailoredDocuments {
    pub tailored_resume: String,
    pub cover_letter: Option<String>,
}

/// Rewrites the resume for the job description at the requested level.
pub async fn tailor_resume(
    llm: &dyn CompletionClient,
    input: &ValidatedInput,
    level: TailoringLevel,
) -> Result<String, AppError> {
    generate(llm, input, OutputKind::TailoredResume, level).await
}

/// Drafts a cover letter from the resume and job description.
pub async fn draft_cover_letter(
    llm: &dyn CompletionClient,
    input: &ValidatedInput,
) -> Result<String, AppError> {
    generate(llm, input, OutputKind::CoverLetter, TailoringLevel::default()).await
}

/// Tailored resume, then the cover letter when asked for.
/// The cover letter call is only made once the resume call succeeded.
pub async fn tailor_documents(
    llm: &dyn CompletionClient,
    input: &ValidatedInput,
    level: TailoringLevel,
    include_cover_letter: bool,
) -> Result<TailoredDocuments, AppError> {
    let tailored_resume = tailor_resume(llm, input, level).await?;

    let cover_letter = if include_cover_letter {
        Some(draft_cover_letter(llm, input).await?)
    } else {
        None
    };

    Ok(TailoredDocuments {
        tailored_resume,
        cover_letter,
    })
}

async fn generate(
    llm: &dyn CompletionClient,
    input: &ValidatedInput,
    kind: OutputKind,
    level: TailoringLevel,
) -> Result<String, AppError> {
    let prompt = build_prompt(input, kind, level);

    info!(
        "Requesting {:?} (level={}, resume_chars={}, jd_chars={})",
        kind,
        level.as_str(),
        input.resume.chars().count(),
        input.job_description.chars().count()
    );

    match llm.complete(&prompt).await {
        Ok(completion) => {
            info!(
                "{:?} generated ({} chars)",
                kind,
                completion.text.chars().count()
            );
            Ok(completion.text)
        }
        Err(e) => {
            warn!("{:?} generation failed: {}", kind, e);
            Err(AppError::Llm(e))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::ScriptedClient;
    use super::*;
    use crate::llm_client::LlmError;
    use crate::tailoring::prompts::{COVER_LETTER_SYSTEM, RESUME_DEEP_SYSTEM};

    fn input() -> ValidatedInput {
        ValidatedInput {
            resume: "Jane Doe\nGo developer".to_string(),
            job_description: "Rust developer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_resume_only_makes_one_call() {
        let llm = ScriptedClient::replying(&["Jane Doe\nRust developer"]);
        let docs = tailor_documents(&llm, &input(), TailoringLevel::Deep, false)
            .await
            .unwrap();

        assert_eq!(docs.tailored_resume, "Jane Doe\nRust developer");
        assert!(docs.cover_letter.is_none());
        assert_eq!(llm.calls(), 1);
        assert!(llm.prompts()[0].system.starts_with(RESUME_DEEP_SYSTEM));
    }

    #[tokio::test]
    async fn test_cover_letter_makes_second_call() {
        let llm = ScriptedClient::replying(&["tailored", "Dear hiring manager"]);
        let docs = tailor_documents(&llm, &input(), TailoringLevel::Light, true)
            .await
            .unwrap();

        assert_eq!(docs.cover_letter.as_deref(), Some("Dear hiring manager"));
        assert_eq!(llm.calls(), 2);
        assert!(llm.prompts()[1].system.starts_with(COVER_LETTER_SYSTEM));
    }

    #[tokio::test]
    async fn test_failed_resume_skips_cover_letter() {
        let llm = ScriptedClient::new(vec![Err(LlmError::Unauthorized { status: 401 })]);
        let err = tailor_documents(&llm, &input(), TailoringLevel::Light, true)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Llm(LlmError::Unauthorized { .. })));
        assert_eq!(llm.calls(), 1);
    }
}
