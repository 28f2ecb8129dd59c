//! Typed error hierarchy for the review backend.
//!
//! Three enums cover the three failure surfaces:
//! - `ValidationError` — client faults detected before any oracle call
//! - `CompletionError` — LLM transport/protocol failures
//! - `ApiError` — the HTTP-facing classification the handlers return

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Upload validation failures. Every message names exactly the check
/// that failed and leaks no internal detail.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No file provided")]
    MissingFilename,

    #[error("File size exceeds maximum allowed size of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("File must be a valid text file with UTF-8 encoding")]
    NotUtf8,

    #[error("Uploaded file is empty")]
    Empty,
}

/// Failures from a single LLM completion call. A closed tagged set so
/// callers can branch on kind instead of parsing message text.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("LLM request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("LLM request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("LLM endpoint returned status {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    #[error("Failed to parse LLM response: {0}")]
    MalformedResponse(#[source] reqwest::Error),
}

/// HTTP-facing error classification. Everything the pipeline can raise
/// converts into one of these at the handler boundary.
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::TooLarge { .. } => ApiError::PayloadTooLarge(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        // Oracle failures are always server faults, never client faults.
        ApiError::Internal(format!("Failed to process code review: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_too_large_carries_limit() {
        let err = ValidationError::TooLarge { limit: 5_242_880 };
        match &err {
            ValidationError::TooLarge { limit } => assert_eq!(*limit, 5_242_880),
            _ => panic!("Expected TooLarge variant"),
        }
        assert!(err.to_string().contains("5242880"));
    }

    #[test]
    fn validation_messages_name_the_failed_check() {
        assert_eq!(
            ValidationError::MissingFilename.to_string(),
            "No file provided"
        );
        assert_eq!(ValidationError::Empty.to_string(), "Uploaded file is empty");
        assert!(ValidationError::NotUtf8.to_string().contains("UTF-8"));
    }

    #[test]
    fn too_large_maps_to_payload_too_large() {
        let api: ApiError = ValidationError::TooLarge { limit: 10 }.into();
        assert!(matches!(api, ApiError::PayloadTooLarge(_)));
    }

    #[test]
    fn other_validation_errors_map_to_bad_request() {
        for err in [
            ValidationError::MissingFilename,
            ValidationError::NotUtf8,
            ValidationError::Empty,
        ] {
            let api: ApiError = err.into();
            assert!(matches!(api, ApiError::BadRequest(_)));
        }
    }

    #[test]
    fn completion_timeout_names_the_configured_value() {
        let err = CompletionError::Timeout { seconds: 120 };
        assert!(err.to_string().contains("120 seconds"));
    }

    #[test]
    fn completion_upstream_status_is_matchable() {
        let err = CompletionError::UpstreamStatus {
            status: 503,
            message: "model loading".to_string(),
        };
        match &err {
            CompletionError::UpstreamStatus { status, message } => {
                assert_eq!(*status, 503);
                assert_eq!(message, "model loading");
            }
            _ => panic!("Expected UpstreamStatus"),
        }
    }

    #[test]
    fn completion_errors_map_to_internal_with_cause() {
        let api: ApiError = CompletionError::Timeout { seconds: 5 }.into();
        match api {
            ApiError::Internal(msg) => {
                assert!(msg.starts_with("Failed to process code review:"));
                assert!(msg.contains("5 seconds"));
            }
            _ => panic!("Expected Internal"),
        }
    }

    #[tokio::test]
    async fn api_error_renders_json_body_with_status() {
        use http_body_util::BodyExt;

        let resp = ApiError::BadRequest("No file provided".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "No file provided");

        let resp = ApiError::PayloadTooLarge("too big".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let resp = ApiError::Internal("oracle down".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&ValidationError::Empty);
        assert_std_error(&CompletionError::Timeout { seconds: 1 });
    }
}
