//! Document retrieval: download the bytes behind a locator.
//!
//! One GET, no retry. The body is streamed and counted against
//! [`PipelineConfig::max_download_bytes`]; a `Content-Length` above the cap
//! fails before any body bytes are read. The whole exchange is bounded by
//! the client timeout. Dropping the returned future abandons the download.

use crate::config::PipelineConfig;
use crate::error::{FetchError, RiskError};
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info};

/// Raw bytes of a downloaded document plus the locator they came from.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub locator: String,
    pub bytes: Vec<u8>,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Build the shared HTTP client used for every download.
pub fn build_client(config: &PipelineConfig) -> Result<reqwest::Client, RiskError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .build()
        .map_err(|e| RiskError::Internal(format!("Failed to build HTTP client: {e}")))
}

/// Download `locator` into memory.
pub async fn fetch(
    client: &reqwest::Client,
    locator: &str,
    config: &PipelineConfig,
) -> Result<RawDocument, FetchError> {
    if !is_url(locator) {
        return Err(FetchError::InvalidLocator {
            locator: locator.to_string(),
        });
    }
    info!("Downloading document from: {}", locator);

    let classify = |e: reqwest::Error| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: locator.to_string(),
                secs: config.download_timeout_secs,
            }
        } else {
            FetchError::Transport {
                url: locator.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let response = client.get(locator).send().await.map_err(classify)?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: locator.to_string(),
            status: response.status().as_u16(),
        });
    }

    let limit = config.max_download_bytes;
    let too_large = || FetchError::TooLarge {
        url: locator.to_string(),
        limit,
    };

    if response.content_length().is_some_and(|len| len > limit) {
        return Err(too_large());
    }

    let mut bytes = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(classify)?;
        if (bytes.len() + chunk.len()) as u64 > limit {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }

    debug!("Downloaded {} bytes from {}", bytes.len(), locator);

    Ok(RawDocument {
        locator: locator.to_string(),
        bytes,
    })
}
