//! Text extraction: turn PDF bytes into one linear text blob.
//!
//! `lopdf` parsing is synchronous and CPU-bound, so the work runs inside
//! `tokio::task::spawn_blocking` and is bounded by
//! [`PipelineConfig::extraction_timeout_secs`].
//!
//! Pages are visited in page-number order and their text concatenated with no
//! separator. A page whose content stream cannot be decoded contributes an
//! empty string: it is logged and counted in [`ExtractedText::empty_pages`],
//! never fatal. Only a document that cannot be parsed at all is an error.

use crate::config::PipelineConfig;
use crate::error::ExtractionError;
use crate::pipeline::fetch::RawDocument;
use lopdf::Document;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Linear text of a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    /// Concatenated per-page text, page order preserved. May be empty.
    pub text: String,
    pub page_count: usize,
    /// Pages that produced no text (unreadable or genuinely blank).
    pub empty_pages: usize,
}

impl ExtractedText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Extract the text of every page of `document`.
pub async fn extract(
    document: RawDocument,
    config: &PipelineConfig,
) -> Result<ExtractedText, ExtractionError> {
    let secs = config.extraction_timeout_secs;
    let task = tokio::task::spawn_blocking(move || extract_blocking(&document));

    tokio::time::timeout(Duration::from_secs(secs), task)
        .await
        .map_err(|_| ExtractionError::Timeout { secs })?
        .map_err(|e| ExtractionError::TaskFailed(e.to_string()))?
}

/// Blocking implementation of text extraction.
pub fn extract_blocking(document: &RawDocument) -> Result<ExtractedText, ExtractionError> {
    let bytes = &document.bytes;
    if !bytes.starts_with(b"%PDF") {
        return Err(ExtractionError::NotAPdf {
            locator: document.locator.clone(),
            magic: bytes.iter().take(4).copied().collect(),
        });
    }

    let pdf = Document::load_mem(bytes).map_err(|e| ExtractionError::Malformed {
        locator: document.locator.clone(),
        detail: e.to_string(),
    })?;

    let pages = pdf.get_pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut out = ExtractedText {
        page_count: pages.len(),
        ..ExtractedText::default()
    };

    for &page_num in pages.keys() {
        let page_text = match pdf.extract_text(&[page_num]) {
            Ok(t) => t,
            Err(e) => {
                warn!("Page {} text unreadable, using empty text: {}", page_num, e);
                String::new()
            }
        };
        if page_text.is_empty() {
            out.empty_pages += 1;
        }
        debug!("Page {} → {} chars", page_num, page_text.len());
        out.text.push_str(&page_text);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(bytes: &[u8]) -> RawDocument {
        RawDocument {
            locator: "https://example.com/doc.pdf".into(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn non_pdf_bytes_rejected() {
        let err = extract_blocking(&raw(b"<html>nope</html>")).unwrap_err();
        match err {
            ExtractionError::NotAPdf { magic, .. } => assert_eq!(magic, b"<htm"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn truncated_pdf_is_malformed() {
        let err = extract_blocking(&raw(b"%PDF-1.5\n%garbage only")).unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn async_wrapper_propagates_errors() {
        let err = extract(raw(b"nope"), &PipelineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NotAPdf { .. }));
    }
}
