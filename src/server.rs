//! Server assembly: router layers, bind, graceful shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, extract::DefaultBodyLimit};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::api::{self, AppState, SharedState};
use crate::config::Settings;
use crate::llm::OllamaClient;

/// Headroom added to the body limit so multipart framing around a
/// max-size file does not trip the transport limit before our own size
/// check can answer with a proper message.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Configuration for the HTTP server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub settings: Settings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            settings: Settings::default(),
        }
    }
}

/// Build the application router with CORS and body-limit layers applied.
pub fn build_router(state: SharedState) -> Router {
    let body_limit = state.settings.max_file_size + MULTIPART_OVERHEAD;
    api::api_router()
        .layer(DefaultBodyLimit::max(body_limit))
        // The browser frontend is served from a different origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server and block until shutdown.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let llm = OllamaClient::new(&config.settings)?;
    let state = Arc::new(AppState {
        settings: config.settings,
        llm,
    });

    info!(
        ollama_url = %state.settings.ollama_url,
        model = %state.settings.model_name,
        "configured LLM endpoint"
    );

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    info!("Code review backend running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Shutting down...");
}
