//! HTTP client for the Ollama generate API.
//!
//! One completion per call, no retries: a failed call surfaces
//! immediately as a [`CompletionError`] and the caller decides what to do.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::errors::CompletionError;

/// Request body for `POST /api/generate`. `stream` is always false: the
/// pipeline wants one complete response, not a token stream.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// The subset of the Ollama response we consume. The generated text is
/// defaulted to empty when the field is absent.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for a single Ollama-compatible completion endpoint.
///
/// Construct once at startup and share; the inner `reqwest::Client`
/// pools connections and carries the configured timeout.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            url: settings.ollama_url.clone(),
            model: settings.model_name.clone(),
            timeout_secs: settings.request_timeout_secs,
        })
    }

    /// Send `prompt` to the model and return the generated text, trimmed.
    ///
    /// Exactly one network call per invocation. Failures map onto the
    /// closed [`CompletionError`] set: timeout, transport, upstream
    /// status, malformed body.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "sending completion request");

        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default().trim().to_string();
            return Err(CompletionError::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| self.classify_body_error(e))?;

        Ok(parsed.response.trim().to_string())
    }

    fn classify_send_error(&self, err: reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            CompletionError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            CompletionError::Transport(err)
        }
    }

    fn classify_body_error(&self, err: reqwest::Error) -> CompletionError {
        // The body read shares the request deadline; a slow-trickling
        // response times out here rather than in send().
        if err.is_timeout() {
            CompletionError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            CompletionError::MalformedResponse(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(url: &str) -> OllamaClient {
        let settings = Settings {
            ollama_url: url.to_string(),
            ..Settings::default()
        };
        OllamaClient::new(&settings).unwrap()
    }

    #[test]
    fn generate_request_serializes_with_stream_disabled() {
        let req = GenerateRequest {
            model: "qwen2.5-coder:14b",
            prompt: "Summarize this",
            stream: false,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""model":"qwen2.5-coder:14b""#));
        assert!(json.contains(r#""prompt":"Summarize this""#));
        assert!(json.contains(r#""stream":false"#));
    }

    #[test]
    fn generate_response_reads_response_field() {
        let json = r#"{"model":"m","response":"  the summary  ","done":true}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.response, "  the summary  ");
    }

    #[test]
    fn missing_response_field_defaults_to_empty() {
        let json = r#"{"model":"m","done":true}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.response, "");
    }

    #[test]
    fn client_captures_configured_endpoint_and_model() {
        let client = test_client("http://127.0.0.1:9/api/generate");
        assert_eq!(client.url, "http://127.0.0.1:9/api/generate");
        assert_eq!(client.model, "qwen2.5-coder:14b");
        assert_eq!(client.timeout_secs, 120);
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        // Port 9 (discard) is almost never listening; if the sandbox
        // forbids even the attempt the error is still transport-class.
        let client = test_client("http://127.0.0.1:9/api/generate");
        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, CompletionError::Transport(_)));
    }
}
