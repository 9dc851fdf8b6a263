//! Request-level orchestration: locator in, [`PredictionResult`] out.
//!
//! [`RiskPipeline`] owns everything that is shared across requests (HTTP
//! client, scorer, default template, config) and is built once at startup.
//! Each [`RiskPipeline::predict`] call runs the five stages in sequence.
//!
//! Document stages degrade instead of failing: any fetch, extraction or parse
//! problem is logged, the default template is scored instead, and
//! `extractionInfo` / `dataSource` say what happened. Only scorer rejection
//! returns `Err`.

use crate::config::PipelineConfig;
use crate::error::{RiskError, StageFailure};
use crate::features::FeatureMap;
use crate::model::Scorer;
use crate::output::PredictionResult;
use crate::pipeline::assemble::{assemble, Provenance};
use crate::pipeline::reconcile::{reconcile, Missing, ReconcileMode};
use crate::pipeline::{extract, fetch, parse};
use crate::template::FeatureTemplate;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

const NO_URL_INFO: &str = "No PDF URL provided.";

/// Shared, read-only scoring pipeline.
pub struct RiskPipeline {
    client: reqwest::Client,
    scorer: Arc<dyn Scorer>,
    template: Arc<FeatureTemplate>,
    config: PipelineConfig,
}

impl std::fmt::Debug for RiskPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskPipeline")
            .field("scorer", &"<dyn Scorer>")
            .field("schema", self.scorer.schema())
            .field("template_len", &self.template.len())
            .field("config", &self.config)
            .finish()
    }
}

impl RiskPipeline {
    pub fn new(
        scorer: Arc<dyn Scorer>,
        template: Arc<FeatureTemplate>,
        config: PipelineConfig,
    ) -> Result<Self, RiskError> {
        let client = fetch::build_client(&config)?;
        Ok(Self {
            client,
            scorer,
            template,
            config,
        })
    }

    /// Pipeline with the built-in readmission template and default config.
    pub fn with_defaults(scorer: Arc<dyn Scorer>) -> Result<Self, RiskError> {
        Self::new(
            scorer,
            FeatureTemplate::readmission_baseline(),
            PipelineConfig::default(),
        )
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Score the document at `pdf_url`, or the default template when absent.
    ///
    /// An empty string counts as absent.
    pub async fn predict(&self, pdf_url: Option<&str>) -> Result<PredictionResult, RiskError> {
        let start = Instant::now();
        info!("Received PDF URL: {:?}", pdf_url);

        let (sparse, stage_info) = match pdf_url.filter(|u| !u.is_empty()) {
            None => (FeatureMap::new(), Some(NO_URL_INFO)),
            Some(url) => match self.gather_features(url).await {
                Ok(sparse) => (sparse, None),
                Err(failure) => {
                    warn!("Falling back to default features for {}: {}", url, failure);
                    (FeatureMap::new(), Some(failure.extraction_info()))
                }
            },
        };

        let reconciled = reconcile(&sparse, self.scorer.schema(), &self.template);
        if reconciled.mode == ReconcileMode::Positional {
            warn!(
                "Model exposes no feature names; using first {} template-ordered values (alignment not guaranteed)",
                reconciled.vector.len()
            );
        }
        if let Missing::Named(ref names) = reconciled.missing {
            if !sparse.is_empty() && !names.is_empty() {
                info!("Missing features: {:?}", names);
            }
        }

        let extraction_info = match stage_info {
            Some(info) => info.to_string(),
            None => match reconciled.missing.count() {
                Some(missing) => format!(
                    "Successfully extracted {} features from PDF. Missing {} features.",
                    sparse.len(),
                    missing
                ),
                None => format!(
                    "Extracted {} features from PDF, but model feature names unknown.",
                    sparse.len()
                ),
            },
        };

        let result = assemble(
            self.scorer.as_ref(),
            &reconciled,
            Provenance {
                received_url: pdf_url.map(str::to_string),
                extraction_info,
                extracted_features: sparse.len(),
            },
        )?;

        info!(
            "Prediction: risk={:.2}% source={:?} in {}ms",
            result.readmission_risk,
            result.data_source,
            start.elapsed().as_millis()
        );
        Ok(result)
    }

    /// Fetch → extract → parse. Any failure is returned for the caller to absorb.
    async fn gather_features(&self, url: &str) -> Result<FeatureMap, StageFailure> {
        let document = fetch::fetch(&self.client, url, &self.config).await?;
        let extracted = extract::extract(document, &self.config).await?;
        if extracted.is_empty() {
            return Err(StageFailure::EmptyText);
        }
        if extracted.empty_pages > 0 {
            info!(
                "{}/{} pages yielded no text",
                extracted.empty_pages, extracted.page_count
            );
        }

        let sparse = parse::parse_features(&extracted.text);
        if sparse.is_empty() {
            return Err(StageFailure::EmptyParse);
        }
        Ok(sparse)
    }
}
