use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; sessions never share anything through it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when no credential was found at startup. Every generation
    /// request then answers "service unavailable" without a network call.
    pub llm: Option<Arc<dyn CompletionClient>>,
}

impl AppState {
    pub fn llm(&self) -> Result<&dyn CompletionClient, AppError> {
        self.llm.as_deref().ok_or(AppError::ServiceUnavailable)
    }

    pub fn is_available(&self) -> bool {
        self.llm.is_some()
    }
}
