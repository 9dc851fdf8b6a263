//! # readmit-risk
//!
//! Score hospital-readmission risk from feature pairs embedded in remote PDF
//! documents.
//!
//! A caller hands over a URL. The document is downloaded, its text extracted,
//! and every `'feature_name': value` pair found anywhere in the text is
//! collected. Those values are lined up against the feature schema of a
//! pre-trained model, gaps are filled from a default patient profile, and the
//! model's positive-class probability comes back as a percentage together
//! with a record of where the numbers came from.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL
//!  │
//!  ├─ 1. Fetch      download with timeout + size cap (reqwest)
//!  ├─ 2. Extract    per-page text, concatenated (lopdf, spawn_blocking)
//!  ├─ 3. Parse      'name': number pairs → sparse map (regex)
//!  ├─ 4. Reconcile  align to model schema, fill from default template
//!  └─ 5. Assemble   p(readmit) × 100 + provenance
//! ```
//!
//! Stages 1–3 never fail a request: on any problem the default template is
//! scored and `dataSource` / `extractionInfo` report the degradation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use readmit_risk::{ForestModel, RiskPipeline};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = ForestModel::load("readmission_model.json")?;
//!     let pipeline = RiskPipeline::with_defaults(Arc::new(model))?;
//!     let result = pipeline
//!         .predict(Some("https://example.com/discharge-summary.pdf"))
//!         .await?;
//!     println!("{:.1}% ({:?})", result.readmission_risk, result.data_source);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | axum HTTP service and the `readmit` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod predict;
#[cfg(feature = "server")]
pub mod server;
pub mod template;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{ExtractionError, FetchError, RiskError, StageFailure};
pub use features::{FeatureMap, FeatureValue};
pub use model::{FeatureSchema, ForestModel, Scorer};
pub use output::{DataSource, MissingFeatures, PredictionResult};
pub use pipeline::parse::parse_features;
pub use pipeline::reconcile::{reconcile, Missing, ReconcileMode, Reconciliation};
pub use predict::RiskPipeline;
pub use template::FeatureTemplate;
