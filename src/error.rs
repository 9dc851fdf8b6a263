//! Error types for the readmit-risk library.
//!
//! Two distinct error families reflect two distinct failure modes:
//!
//! * [`RiskError`] is **fatal**: the request cannot produce a score at all
//!   (model artifact missing or malformed, scorer rejected the vector).
//!   Returned as `Err(RiskError)` from [`crate::predict::RiskPipeline::predict`].
//!
//! * [`StageFailure`] is **non-fatal**: fetching, extracting or parsing the
//!   document failed. The pipeline absorbs it, scores the default feature
//!   template instead and reports the failing stage in `extractionInfo`.
//!
//! [`FetchError`] and [`ExtractionError`] carry the detail for the two
//! stages that talk to the outside world; they are wrapped by
//! [`StageFailure`] once the pipeline decides to degrade.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the readmit-risk library.
///
/// Document-level failures use [`StageFailure`] and never reach the caller
/// as an `Err`.
#[derive(Debug, Error)]
pub enum RiskError {
    // ── Model errors ──────────────────────────────────────────────────────
    /// The model artifact could not be read from disk.
    #[error("Failed to read model artifact '{path}': {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact was read but is not a usable model.
    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    /// The scorer refused the feature vector (length mismatch, bad output shape).
    #[error("Model inference failed: {0}")]
    ModelInference(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure to retrieve the document bytes.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The locator is not an HTTP/HTTPS URL.
    #[error("Invalid locator '{locator}': not a valid HTTP/HTTPS URL")]
    InvalidLocator { locator: String },

    /// Connection, TLS or body-read failure.
    #[error("Failed to download '{url}': {reason}")]
    Transport { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("Failed to download '{url}': HTTP {status}")]
    Status { url: String, status: u16 },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    Timeout { url: String, secs: u64 },

    /// Body is larger than the configured cap.
    #[error("Document at '{url}' exceeds the {limit}-byte download limit")]
    TooLarge { url: String, limit: u64 },
}

/// Failure to turn downloaded bytes into text.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    /// The bytes do not start with the `%PDF` magic.
    #[error("Document from '{locator}' is not a PDF (first bytes: {magic:?})")]
    NotAPdf { locator: String, magic: Vec<u8> },

    /// Header, trailer or xref is corrupt and cannot be parsed.
    #[error("PDF from '{locator}' is corrupt: {detail}")]
    Malformed { locator: String, detail: String },

    /// Parsing took longer than the configured bound.
    #[error("Text extraction timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The blocking extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    TaskFailed(String),
}

/// A non-fatal failure in the document stages.
///
/// The pipeline falls back to the default template whenever one of these
/// occurs. [`StageFailure::extraction_info`] yields the caller-facing
/// diagnostic string.
#[derive(Debug, Clone, Error)]
pub enum StageFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The document parsed but yielded no text at all.
    #[error("PDF contained no extractable text")]
    EmptyText,

    /// Text was extracted but no `'name': value` pair matched.
    #[error("no feature pairs found in extracted text")]
    EmptyParse,
}

impl StageFailure {
    /// Caller-facing `extractionInfo` for this failure.
    ///
    /// Fetch, extraction and empty-text failures all report the same string;
    /// the detailed cause only goes to the log.
    pub fn extraction_info(&self) -> &'static str {
        match self {
            StageFailure::Fetch(_) | StageFailure::Extraction(_) | StageFailure::EmptyText => {
                "Failed to extract text from PDF."
            }
            StageFailure::EmptyParse => {
                "Extracted text from PDF but couldn't parse required fields."
            }
        }
    }
}
