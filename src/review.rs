//! The review pipeline: validate → summarize → rewrite → sanitize → diff.
//!
//! Everything here is request-scoped; no state survives a request. The
//! two oracle calls are sequential and fail fast: a summary failure means
//! the rewrite call is never issued.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::diff;
use crate::errors::{CompletionError, ValidationError};
use crate::llm::OllamaClient;
use crate::prompts;

/// A validated upload. Immutable once constructed; lives for the
/// duration of one request.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub filename: String,
    pub content: String,
    pub size_bytes: usize,
}

impl SourceDocument {
    /// Validate raw upload bytes into a document.
    ///
    /// Checks run in order: filename present, size within `max_size`,
    /// valid UTF-8, non-whitespace content. The first violation wins.
    pub fn from_upload(
        filename: &str,
        bytes: Vec<u8>,
        max_size: usize,
    ) -> Result<Self, ValidationError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(ValidationError::MissingFilename);
        }
        let size_bytes = bytes.len();
        if size_bytes > max_size {
            return Err(ValidationError::TooLarge { limit: max_size });
        }
        let content = String::from_utf8(bytes).map_err(|_| ValidationError::NotUtf8)?;
        if content.trim().is_empty() {
            return Err(ValidationError::Empty);
        }
        Ok(Self {
            filename: filename.to_string(),
            content,
            size_bytes,
        })
    }
}

/// The terminal artifact returned to the caller.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub summary: String,
    pub original_code: String,
    pub improved_code: String,
    pub diff: String,
    pub filename: String,
}

/// Run the full review pipeline for one document.
///
/// Issues the summary completion, then the rewrite completion, sanitizes
/// the rewrite, and diffs it against the original. Empty oracle output
/// never propagates: an empty summary becomes a fixed fallback message
/// and an empty rewrite falls back to the original code (which also makes
/// the diff the no-changes sentinel).
pub async fn run_review(
    llm: &OllamaClient,
    doc: &SourceDocument,
) -> Result<ReviewResponse, CompletionError> {
    info!(file = %doc.filename, size_bytes = doc.size_bytes, "generating code summary");
    let summary = llm
        .complete(&prompts::summary_prompt(&doc.content, &doc.filename))
        .await?;
    let summary = if summary.is_empty() {
        warn!(file = %doc.filename, "oracle returned empty summary, using fallback");
        prompts::SUMMARY_FALLBACK.to_string()
    } else {
        summary
    };

    info!(file = %doc.filename, "generating improved code");
    let rewrite = llm
        .complete(&prompts::rewrite_prompt(&doc.content, &doc.filename))
        .await?;
    let improved_code = if rewrite.is_empty() {
        warn!(file = %doc.filename, "oracle returned empty rewrite, keeping original");
        doc.content.clone()
    } else {
        prompts::strip_markdown_fences(&rewrite)
    };

    info!(file = %doc.filename, "generating diff");
    let diff = diff::generate_diff(&doc.content, &improved_code, &doc.filename);

    info!(file = %doc.filename, "review completed");
    Ok(ReviewResponse {
        summary,
        original_code: doc.content.clone(),
        improved_code,
        diff,
        filename: doc.filename.clone(),
    })
}
