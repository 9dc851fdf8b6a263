//! Result types returned by the pipeline and sent over the wire.
//!
//! Field names serialise in the camelCase form HTTP clients already consume:
//! `readmissionRisk`, `receivedUrl`, `dataSource`, `extractionInfo`,
//! `extractedFeatures`, `missingFeatures`.

use serde::{Serialize, Serializer};

/// Whether the scored vector came from the document or from defaults alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Nothing was parsed; the vector is the default template.
    Default,
    /// At least one feature was parsed from the document.
    PdfExtracted,
}

/// Count of schema features not found in the document.
///
/// Serialises as an integer, or the string `"unknown"` when the scorer has
/// no named schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingFeatures {
    Count(usize),
    Unknown,
}

impl Serialize for MissingFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MissingFeatures::Count(n) => serializer.serialize_u64(*n as u64),
            MissingFeatures::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

/// Outcome of one scoring request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Positive-class probability as a percentage, in `[0, 100]`.
    pub readmission_risk: f64,
    pub success: bool,
    /// Echo of the requested locator (`null` when none was given).
    pub received_url: Option<String>,
    pub data_source: DataSource,
    /// Human-readable description of how far extraction got.
    pub extraction_info: String,
    pub extracted_features: usize,
    pub missing_features: MissingFeatures,
}
