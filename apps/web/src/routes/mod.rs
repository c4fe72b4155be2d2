pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::page::handlers as page;
use crate::state::AppState;
use crate::tailoring::handlers as api;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Page
        .route("/", get(page::handle_index).post(page::handle_submit))
        .route("/download", post(page::handle_download))
        // JSON API
        .route("/api/v1/tailor", post(api::handle_tailor))
        .route("/api/v1/cover-letter", post(api::handle_cover_letter))
        .route("/api/v1/diff", post(api::handle_diff))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
