//! Input validation for the two free-text fields.
//!
//! Validation runs before anything touches the completion client: an empty or
//! whitespace-only field never costs an API call.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Resume,
    JobDescription,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Resume => f.write_str("your resume"),
            Field::JobDescription => f.write_str("the job description"),
        }
    }
}

/// One or both inputs were empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.missing))]
pub struct ValidationError {
    pub missing: Vec<Field>,
}

fn describe(missing: &[Field]) -> String {
    match missing {
        [field] => format!("Please provide {field}."),
        _ => "Please provide both your resume and the job description.".to_string(),
    }
}

/// A resume / job description pair that passed validation.
/// Text is kept verbatim; only the emptiness check trims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput {
    pub resume: String,
    pub job_description: String,
}

pub fn validate(resume: &str, job_description: &str) -> Result<ValidatedInput, ValidationError> {
    let missing: Vec<Field> = [
        (Field::Resume, resume),
        (Field::JobDescription, job_description),
    ]
    .into_iter()
    .filter(|(_, text)| text.trim().is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(ValidationError { missing });
    }

    Ok(ValidatedInput {
        resume: resume.to_string(),
        job_description: job_description.to_string(),
    })
}
