//! Runtime configuration for the review backend.
//!
//! All values are read from the environment once at startup and passed
//! around explicitly; nothing here mutates after [`Settings::from_env`].

use anyhow::{Context, Result};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL_NAME: &str = "qwen2.5-coder:14b";
/// 5 MiB upload ceiling.
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
/// LLM inference is slow by nature; two minutes per call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Process-wide settings, read-only after startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Ollama generate endpoint, e.g. `http://localhost:11434/api/generate`.
    pub ollama_url: String,
    /// Model identifier passed verbatim in every completion request.
    pub model_name: String,
    /// Maximum accepted upload size in bytes.
    pub max_file_size: usize,
    /// Per-call timeout for outbound LLM requests, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings from `OLLAMA_URL`, `MODEL_NAME`, `MAX_FILE_SIZE` and
    /// `REQUEST_TIMEOUT`, falling back to the defaults above. Unparseable
    /// numeric values fail startup instead of being silently replaced.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let ollama_url = lookup("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        let model_name = lookup("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());

        let max_file_size = match lookup("MAX_FILE_SIZE") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("Invalid MAX_FILE_SIZE value: {raw}"))?,
            None => DEFAULT_MAX_FILE_SIZE,
        };

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("Invalid REQUEST_TIMEOUT value: {raw}"))?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            ollama_url,
            model_name,
            max_file_size,
            request_timeout_secs,
        })
    }
}
