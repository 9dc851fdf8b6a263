//! Configuration for the scoring pipeline.
//!
//! All pipeline behaviour that is not the model itself is controlled through
//! [`PipelineConfig`], built via its [`PipelineConfigBuilder`]. The config is
//! cloned into the pipeline once at startup and only read afterwards.

use crate::error::RiskError;
use serde::{Deserialize, Serialize};

/// Smallest download cap accepted by the builder.
const MIN_DOWNLOAD_BYTES: u64 = 1024;

/// Configuration for a [`crate::predict::RiskPipeline`].
///
/// Built via [`PipelineConfig::builder()`] or using
/// [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use readmit_risk::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .download_timeout_secs(10)
///     .max_download_bytes(5 * 1024 * 1024)
///     .build()
///     .unwrap();
/// assert_eq!(config.download_timeout_secs, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Whole-request timeout for the document download, in seconds. Default: 30.
    pub download_timeout_secs: u64,

    /// Maximum document size in bytes. Default: 20 MiB.
    ///
    /// Checked against `Content-Length` before reading and again while the
    /// body streams in, so servers that omit the header are bounded too.
    pub max_download_bytes: u64,

    /// Upper bound on PDF parsing and text extraction, in seconds. Default: 30.
    pub extraction_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            download_timeout_secs: 30,
            max_download_bytes: 20 * 1024 * 1024,
            extraction_timeout_secs: 30,
        }
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn max_download_bytes(mut self, bytes: u64) -> Self {
        self.config.max_download_bytes = bytes;
        self
    }

    pub fn extraction_timeout_secs(mut self, secs: u64) -> Self {
        self.config.extraction_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, RiskError> {
        let c = &self.config;
        if c.download_timeout_secs == 0 {
            return Err(RiskError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        if c.extraction_timeout_secs == 0 {
            return Err(RiskError::InvalidConfig(
                "Extraction timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_download_bytes < MIN_DOWNLOAD_BYTES {
            return Err(RiskError::InvalidConfig(format!(
                "Download limit must be ≥ {MIN_DOWNLOAD_BYTES} bytes, got {}",
                c.max_download_bytes
            )));
        }
        Ok(self.config)
    }
}
