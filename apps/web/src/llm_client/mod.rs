//! OpenAI chat completions client.
//!
//! Every model call in Jobfit goes through `CompletionClient`; handlers hold
//! it as a trait object so tests can swap in a scripted fake.
//!
//! Model: gpt-4o-mini, fixed at compile time.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ApiKey;

pub mod prompts;

/// The model used for all completion calls in Jobfit.
pub const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 1800;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API rejected the credential (status {status})")]
    Unauthorized { status: u16 },

    #[error("Rate limited or out of quota: {message}")]
    RateLimited { message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A fully built request for the model: one system instruction, one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Generated text from a single completion call.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// One-shot text generation. Implementations make exactly one call per
/// `complete` and never retry; the user retries by resubmitting.
///
/// Carried in `AppState` as `Arc<dyn CompletionClient>`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat Completions client for the OpenAI API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: ApiKey,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(api_key: ApiKey, base_url: &str) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = classify_failure(status, &body);
            warn!("Completion API returned {}: {}", status, err);
            return Err(err);
        }

        let completion = parse_completion(&body)?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Completion call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(completion)
    }
}

/// Maps a non-2xx response onto the error taxonomy.
fn classify_failure(status: StatusCode, body: &str) -> LlmError {
    // Try to parse error message
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Unauthorized {
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited { message },
        _ => LlmError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

fn parse_completion(body: &str) -> Result<Completion, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(LlmError::EmptyContent)?;

    Ok(Completion {
        text,
        usage: response.usage,
    })
}
