//! HTTP API for the review backend.
//!
//! One review endpoint plus health/info endpoints. All pipeline failures
//! are classified here into [`ApiError`]; nothing escapes unconverted.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
};
use tracing::error;

use crate::config::Settings;
use crate::errors::{ApiError, ValidationError};
use crate::llm::OllamaClient;
use crate::review::{ReviewResponse, SourceDocument, run_review};

// ── Shared application state ──────────────────────────────────────────

/// Constructed once at startup and shared read-only across requests.
pub struct AppState {
    pub settings: Settings,
    pub llm: OllamaClient,
}

pub type SharedState = Arc<AppState>;

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/api/review", post(review_code))
        .route("/api/review/health", get(review_health))
        .route("/", get(root))
        .route("/health", get(health_check))
}

// ── Handlers ──────────────────────────────────────────────────────────

/// `POST /api/review` — upload one source file, get back summary,
/// improved code, and a unified diff.
async fn review_code(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<ReviewResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        // The first field carrying a filename is the source file.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge(e.to_string())
            } else {
                ApiError::BadRequest(format!("Failed to read uploaded file: {}", e))
            }
        })?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }

    let (filename, bytes) = upload.ok_or(ValidationError::MissingFilename)?;
    let doc = SourceDocument::from_upload(&filename, bytes, state.settings.max_file_size)?;

    let review = run_review(&state.llm, &doc).await.map_err(|e| {
        error!(file = %doc.filename, error = %e, "review pipeline failed");
        ApiError::from(e)
    })?;

    Ok(Json(review))
}

/// `GET /api/review/health` — reports configuration only; never probes
/// the oracle's liveness.
async fn review_health(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "code-review",
        "llm_configured": true,
        "ollama_url": state.settings.ollama_url,
        "model": state.settings.model_name,
    }))
}

/// `GET /` — liveness/info at the process root.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Code Review Assistant API is running",
        "status": "active",
    }))
}

/// `GET /health` — liveness plus the configured oracle endpoint.
async fn health_check(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "ollama_url": state.settings.ollama_url,
        "model": state.settings.model_name,
    }))
}
