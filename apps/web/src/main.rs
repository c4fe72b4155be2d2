mod config;
mod diff;
mod errors;
mod export;
mod extract;
mod llm_client;
mod page;
mod routes;
mod state;
mod tailoring;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{load_api_key, Config};
use crate::llm_client::{CompletionClient, OpenAiClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Jobfit v{}", env!("CARGO_PKG_VERSION"));

    // A missing credential does not stop the server: every page answers 503 instead.
    let llm = build_llm_client(&config);
    if llm.is_some() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    }

    let state = AppState {
        config: config.clone(),
        llm,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_llm_client(config: &Config) -> Option<Arc<dyn CompletionClient>> {
    let api_key = match load_api_key(config) {
        Ok(key) => key,
        Err(e) => {
            error!("{e}");
            return None;
        }
    };

    match OpenAiClient::new(api_key, &config.openai_base_url) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            error!("Failed to build LLM client: {e}");
            None
        }
    }
}
