// All LLM prompt constants for the Tailoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::{FACTS_ONLY, PLAIN_TEXT_ONLY};
use crate::llm_client::Prompt;
use crate::tailoring::form::ValidatedInput;

/// What the model is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    TailoredResume,
    CoverLetter,
}

/// How far the model may move away from the user's wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailoringLevel {
    /// Keyword adjustment with minimal wording updates.
    #[default]
    Light,
    /// Bullet rewrites for strong alignment.
    Deep,
}

impl TailoringLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TailoringLevel::Light => "light",
            TailoringLevel::Deep => "deep",
        }
    }

    /// Unknown values fall back to the default.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "deep" => TailoringLevel::Deep,
            _ => TailoringLevel::Light,
        }
    }
}

pub const RESUME_LIGHT_SYSTEM: &str = "You are an expert resume writer. \
    Adjust only lightly: match keywords from the job description and make minimal wording updates. \
    Do not rewrite entire bullets.";

pub const RESUME_DEEP_SYSTEM: &str = "You are an expert resume writer. \
    Rewrite bullets for strong alignment to the job description while preserving facts.";

pub const COVER_LETTER_SYSTEM: &str = "You are a professional career coach. \
    Write a concise, persuasive cover letter that highlights why the candidate is a good fit \
    for the job. Use the resume and job description as context.";

/// Replace `{jd_text}` and `{resume_text}` before sending.
pub const RESUME_PROMPT_TEMPLATE: &str = "Job Description:
{jd_text}

Original Resume:
{resume_text}

Return the tailored resume text.";

/// Replace `{jd_text}` and `{resume_text}` before sending.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = "Job Description:
{jd_text}

Resume:
{resume_text}

Write a professional cover letter (max 300 words).";

/// Formats the validated inputs into the fixed template for `kind`.
/// `level` only affects the tailored resume.
pub fn build_prompt(input: &ValidatedInput, kind: OutputKind, level: TailoringLevel) -> Prompt {
    let (system, template) = match (kind, level) {
        (OutputKind::TailoredResume, TailoringLevel::Light) => {
            (RESUME_LIGHT_SYSTEM, RESUME_PROMPT_TEMPLATE)
        }
        (OutputKind::TailoredResume, TailoringLevel::Deep) => {
            (RESUME_DEEP_SYSTEM, RESUME_PROMPT_TEMPLATE)
        }
        (OutputKind::CoverLetter, _) => (COVER_LETTER_SYSTEM, COVER_LETTER_PROMPT_TEMPLATE),
    };

    // Substitute the job description first so a resume that happens to contain
    // the literal "{jd_text}" is left alone.
    let (before, after) = template
        .split_once("{resume_text}")
        .unwrap_or((template, ""));
    let user = format!(
        "{}{}{}",
        before.replace("{jd_text}", &input.job_description),
        input.resume,
        after
    );

    Prompt {
        system: format!("{system} {FACTS_ONLY} {PLAIN_TEXT_ONLY}"),
        user,
    }
}
