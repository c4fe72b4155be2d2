//! Session state and the per-interaction controller.
//!
//! A session lives in the page itself: every form post carries the full
//! `SessionState` and the server keeps nothing between requests, so a reload
//! (`GET /`) starts from an empty state and sessions never share data.

use tracing::info;

use crate::diff::Granularity;
use crate::errors::{AppError, GENERATION_FAILED_MESSAGE};
use crate::llm_client::CompletionClient;
use crate::tailoring::form::validate;
use crate::tailoring::generator::{draft_cover_letter, tailor_resume};
use crate::tailoring::prompts::TailoringLevel;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub resume_text: String,
    pub job_description: String,
    pub level: TailoringLevel,
    pub include_cover_letter: bool,
    pub granularity: Granularity,
    pub tailored_resume: Option<String>,
    /// The resume text `tailored_resume` was generated from. Edits made to
    /// `resume_text` afterwards are not attributed to the model in the diff.
    pub tailored_from: Option<String>,
    pub cover_letter: Option<String>,
}

impl SessionState {
    /// The resume the current output should be compared against.
    pub fn diff_base(&self) -> &str {
        self.tailored_from.as_deref().unwrap_or(&self.resume_text)
    }
}

/// User actions on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Submit,
    Regenerate,
    CoverLetterOn,
    CoverLetterOff,
}

impl Action {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "regenerate" => Action::Regenerate,
            "cover_on" => Action::CoverLetterOn,
            "cover_off" => Action::CoverLetterOff,
            _ => Action::Submit,
        }
    }
}

/// Inline message shown above the form after an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Bad input; no external call was made.
    Invalid(String),
    /// The completion client failed; the message is always the generic one.
    GenerationFailed,
    Success(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Invalid(msg) | Notice::Success(msg) => msg,
            Notice::GenerationFailed => GENERATION_FAILED_MESSAGE,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Success(_))
    }
}

/// Result of one interaction: the state to redraw and what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub state: SessionState,
    pub notice: Option<Notice>,
}

impl Outcome {
    fn quiet(state: SessionState) -> Self {
        Self {
            state,
            notice: None,
        }
    }

    fn with(state: SessionState, notice: Notice) -> Self {
        Self {
            state,
            notice: Some(notice),
        }
    }
}

/// Applies one user action to the session.
///
/// On any failure the returned state is the state that came in: inputs and
/// previously generated documents are left untouched.
pub async fn apply(state: SessionState, action: Action, llm: &dyn CompletionClient) -> Outcome {
    match action {
        Action::Submit | Action::Regenerate => generate_all(state, llm).await,
        Action::CoverLetterOn => enable_cover_letter(state, llm).await,
        Action::CoverLetterOff => Outcome::quiet(SessionState {
            include_cover_letter: false,
            cover_letter: None,
            ..state
        }),
    }
}

async fn generate_all(state: SessionState, llm: &dyn CompletionClient) -> Outcome {
    let input = match validate(&state.resume_text, &state.job_description) {
        Ok(input) => input,
        Err(e) => return Outcome::with(state, Notice::Invalid(e.to_string())),
    };

    let tailored = match tailor_resume(llm, &input, state.level).await {
        Ok(text) => text,
        Err(e) => return failed(state, e),
    };

    // The resume is kept even if the cover letter call then fails.
    let state = SessionState {
        tailored_resume: Some(tailored),
        tailored_from: Some(input.resume.clone()),
        ..state
    };

    if !state.include_cover_letter {
        info!("Session generated tailored resume (cover_letter=false)");
        return Outcome::with(
            SessionState {
                cover_letter: None,
                ..state
            },
            Notice::Success("Tailored resume generated!".to_string()),
        );
    }

    match draft_cover_letter(llm, &input).await {
        Ok(letter) => {
            info!("Session generated tailored resume (cover_letter=true)");
            Outcome::with(
                SessionState {
                    cover_letter: Some(letter),
                    ..state
                },
                Notice::Success("Tailored resume generated!".to_string()),
            )
        }
        Err(e) => failed(state, e),
    }
}

async fn enable_cover_letter(state: SessionState, llm: &dyn CompletionClient) -> Outcome {
    let state = SessionState {
        include_cover_letter: true,
        ..state
    };

    // Before the first successful generation the toggle only takes effect on
    // the next submit; an existing letter is kept as is.
    if state.tailored_resume.is_none() || state.cover_letter.is_some() {
        return Outcome::quiet(state);
    }

    let input = match validate(&state.resume_text, &state.job_description) {
        Ok(input) => input,
        Err(e) => return Outcome::with(state, Notice::Invalid(e.to_string())),
    };

    match draft_cover_letter(llm, &input).await {
        Ok(letter) => Outcome::with(
            SessionState {
                cover_letter: Some(letter),
                ..state
            },
            Notice::Success("Cover letter generated!".to_string()),
        ),
        Err(e) => failed(state, e),
    }
}

fn failed(state: SessionState, err: AppError) -> Outcome {
    tracing::error!("Generation failed: {err}");
    Outcome::with(state, Notice::GenerationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::tailoring::generator::fakes::ScriptedClient;

    fn filled() -> SessionState {
        SessionState {
            resume_text: "Jane Doe\nGo developer".to_string(),
            job_description: "Rust developer".to_string(),
            ..Default::default()
        }
    }

    fn generated() -> SessionState {
        SessionState {
            tailored_resume: Some("Jane Doe\nRust developer".to_string()),
            ..filled()
        }
    }

    #[tokio::test]
    async fn test_empty_inputs_never_reach_the_client() {
        let llm = ScriptedClient::replying(&["unused"]);
        for (resume, jd) in [("", "jd"), ("resume", "   "), (" \n", "\t")] {
            let state = SessionState {
                resume_text: resume.to_string(),
                job_description: jd.to_string(),
                ..Default::default()
            };
            let outcome = apply(state.clone(), Action::Submit, &llm).await;
            assert!(matches!(outcome.notice, Some(Notice::Invalid(_))));
            assert_eq!(outcome.state, state);
        }
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_stores_tailored_resume() {
        let llm = ScriptedClient::replying(&["Jane Doe\nRust developer"]);
        let outcome = apply(filled(), Action::Submit, &llm).await;

        assert_eq!(
            outcome.state.tailored_resume.as_deref(),
            Some("Jane Doe\nRust developer")
        );
        assert!(outcome.state.cover_letter.is_none());
        assert_eq!(outcome.state.resume_text, filled().resume_text);
        assert!(matches!(outcome.notice, Some(Notice::Success(_))));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_submit_with_toggle_on_drafts_cover_letter_too() {
        let llm = ScriptedClient::replying(&["tailored", "Dear team"]);
        let state = SessionState {
            include_cover_letter: true,
            ..filled()
        };
        let outcome = apply(state, Action::Submit, &llm).await;

        assert_eq!(outcome.state.cover_letter.as_deref(), Some("Dear team"));
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn test_submit_keeps_resume_when_cover_letter_fails() {
        let llm = ScriptedClient::new(vec![
            Ok("Jane Doe\nRust developer".to_string()),
            Err(LlmError::EmptyContent),
        ]);
        let state = SessionState {
            include_cover_letter: true,
            cover_letter: Some("old letter".to_string()),
            ..filled()
        };
        let outcome = apply(state, Action::Submit, &llm).await;

        assert_eq!(outcome.notice, Some(Notice::GenerationFailed));
        assert_eq!(
            outcome.state.tailored_resume.as_deref(),
            Some("Jane Doe\nRust developer")
        );
        assert_eq!(outcome.state.cover_letter.as_deref(), Some("old letter"));
        assert_eq!(outcome.state.resume_text, filled().resume_text);
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn test_submit_records_resume_it_tailored() {
        let llm = ScriptedClient::replying(&["Jane Doe\nRust developer"]);
        let outcome = apply(filled(), Action::Submit, &llm).await;

        assert_eq!(
            outcome.state.tailored_from.as_deref(),
            Some(filled().resume_text.as_str())
        );
        assert_eq!(outcome.state.diff_base(), filled().resume_text);
    }

    #[tokio::test]
    async fn test_failed_resubmit_keeps_previous_diff_base() {
        let llm = ScriptedClient::new(vec![Err(LlmError::EmptyContent)]);
        let before = SessionState {
            resume_text: "Jane Doe\nGo and Kafka developer".to_string(),
            tailored_from: Some("Jane Doe\nGo developer".to_string()),
            ..generated()
        };
        let outcome = apply(before, Action::Submit, &llm).await;

        assert_eq!(outcome.notice, Some(Notice::GenerationFailed));
        assert_eq!(outcome.state.diff_base(), "Jane Doe\nGo developer");
    }

    #[tokio::test]
    async fn test_failure_keeps_prior_state() {
        let llm = ScriptedClient::new(vec![Err(LlmError::RateLimited {
            message: "quota".to_string(),
        })]);
        let before = SessionState {
            cover_letter: Some("old letter".to_string()),
            ..generated()
        };
        let outcome = apply(before.clone(), Action::Regenerate, &llm).await;

        assert_eq!(outcome.notice, Some(Notice::GenerationFailed));
        assert_eq!(outcome.state, before);
        assert_eq!(
            outcome.notice.unwrap().message(),
            GENERATION_FAILED_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_toggle_off_makes_no_call() {
        let llm = ScriptedClient::replying(&["unused"]);
        let state = SessionState {
            include_cover_letter: true,
            cover_letter: Some("Dear team".to_string()),
            ..generated()
        };
        let outcome = apply(state, Action::CoverLetterOff, &llm).await;

        assert!(!outcome.state.include_cover_letter);
        assert!(outcome.state.cover_letter.is_none());
        assert!(outcome.state.tailored_resume.is_some());
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_toggle_on_after_generation_makes_exactly_one_call() {
        let llm = ScriptedClient::replying(&["Dear team", "unexpected"]);
        let outcome = apply(generated(), Action::CoverLetterOn, &llm).await;

        assert!(outcome.state.include_cover_letter);
        assert_eq!(outcome.state.cover_letter.as_deref(), Some("Dear team"));
        assert_eq!(
            outcome.state.tailored_resume,
            generated().tailored_resume,
            "resume is not regenerated"
        );
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_toggle_on_before_generation_only_sets_flag() {
        let llm = ScriptedClient::replying(&["unused"]);
        let outcome = apply(filled(), Action::CoverLetterOn, &llm).await;

        assert!(outcome.state.include_cover_letter);
        assert!(outcome.notice.is_none());
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_toggle_on_with_letter_present_is_a_no_op() {
        let llm = ScriptedClient::replying(&["unused"]);
        let state = SessionState {
            include_cover_letter: true,
            cover_letter: Some("Dear team".to_string()),
            ..generated()
        };
        let outcome = apply(state.clone(), Action::CoverLetterOn, &llm).await;

        assert_eq!(outcome.state, state);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_cover_letter_keeps_resume() {
        let llm = ScriptedClient::new(vec![Err(LlmError::EmptyContent)]);
        let outcome = apply(generated(), Action::CoverLetterOn, &llm).await;

        assert_eq!(outcome.notice, Some(Notice::GenerationFailed));
        assert_eq!(outcome.state.tailored_resume, generated().tailored_resume);
        assert!(outcome.state.cover_letter.is_none());
        assert_eq!(llm.calls(), 1);
    }

    #[test]
    fn test_action_parse() {
        assert_eq!(Action::parse("submit"), Action::Submit);
        assert_eq!(Action::parse("regenerate"), Action::Regenerate);
        assert_eq!(Action::parse("cover_on"), Action::CoverLetterOn);
        assert_eq!(Action::parse("cover_off"), Action::CoverLetterOff);
        assert_eq!(Action::parse("anything"), Action::Submit);
    }
}
