//! CLI binary for readmit-risk.
//!
//! `readmit serve` runs the HTTP service; `readmit predict <URL>` scores one
//! document and prints the JSON result. Both map flags to `PipelineConfig`
//! and load the model the same way.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use readmit_risk::server::{create_router, AppState};
use readmit_risk::{FeatureTemplate, ForestModel, PipelineConfig, RiskPipeline};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on 0.0.0.0:5000 with the model at ./readmission_model.json
  readmit serve

  # Serve a specific model on another port
  MODEL_PATH=models/rf.json readmit serve --port 8080

  # Score one document and print the JSON result
  readmit predict https://example.com/discharge-summary.pdf

  # Score the default patient profile
  readmit predict

ENDPOINTS:
  GET  /health    {"status":"healthy","model_loaded":true}  (503 when no model)
  POST /predict   {"pdfUrl": "https://..."}

ENVIRONMENT VARIABLES:
  MODEL_PATH                   Model artifact (JSON)
  HOST / PORT                  Listen address (serve only)
  READMIT_DOWNLOAD_TIMEOUT     Download timeout in seconds
  READMIT_MAX_DOWNLOAD_BYTES   Download size cap
  READMIT_EXTRACTION_TIMEOUT   PDF text extraction timeout in seconds
  RUST_LOG                     Overrides the log filter
"#;

/// Score readmission risk from feature pairs in remote PDF documents.
#[derive(Parser, Debug)]
#[command(
    name = "readmit",
    version,
    about = "Score readmission risk from feature pairs in remote PDF documents",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "READMIT_VERBOSE")]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(short, long, global = true, env = "READMIT_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service.
    Serve {
        /// Interface to bind.
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on.
        #[arg(long, env = "PORT", default_value_t = 5000)]
        port: u16,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Score a single document and print the result as JSON.
    Predict {
        /// HTTP/HTTPS URL of the PDF. Omit to score the default profile.
        url: Option<String>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// Path to the JSON model artifact.
    #[arg(long, env = "MODEL_PATH", default_value = "readmission_model.json")]
    model_path: PathBuf,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "READMIT_DOWNLOAD_TIMEOUT", default_value_t = 30)]
    download_timeout: u64,

    /// Maximum document size in bytes.
    #[arg(long, env = "READMIT_MAX_DOWNLOAD_BYTES", default_value_t = 20 * 1024 * 1024)]
    max_download_bytes: u64,

    /// PDF text extraction timeout in seconds.
    #[arg(long, env = "READMIT_EXTRACTION_TIMEOUT", default_value_t = 30)]
    extraction_timeout: u64,
}

impl PipelineArgs {
    fn config(&self) -> Result<PipelineConfig> {
        PipelineConfig::builder()
            .download_timeout_secs(self.download_timeout)
            .max_download_bytes(self.max_download_bytes)
            .extraction_timeout_secs(self.extraction_timeout)
            .build()
            .context("Invalid configuration")
    }

    fn pipeline(&self) -> Result<RiskPipeline> {
        let config = self.config()?;
        let model = ForestModel::load(&self.model_path)
            .with_context(|| format!("Failed to load model from {:?}", self.model_path))?;
        RiskPipeline::new(
            Arc::new(model),
            FeatureTemplate::readmission_baseline(),
            config,
        )
        .context("Failed to build pipeline")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Serve {
            host,
            port,
            pipeline,
        } => serve(&host, port, &pipeline).await,
        Command::Predict { url, pipeline } => predict_once(url.as_deref(), &pipeline).await,
    }
}

async fn serve(host: &str, port: u16, args: &PipelineArgs) -> Result<()> {
    // A bad config is an operator error; a bad model only makes us unhealthy.
    args.config()?;
    let pipeline = match args.pipeline() {
        Ok(p) => Some(Arc::new(p)),
        Err(e) => {
            error!("{:#}", e);
            warn!("Serving without a model: /health will report unhealthy");
            None
        }
    };

    let router = create_router(AppState::new(pipeline));

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn predict_once(url: Option<&str>, args: &PipelineArgs) -> Result<()> {
    let pipeline = args.pipeline()?;
    let result = pipeline.predict(url).await.context("Prediction failed")?;
    let json = serde_json::to_string_pretty(&result).context("Failed to serialise result")?;
    println!("{json}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
