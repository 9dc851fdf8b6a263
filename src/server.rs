//! HTTP surface: `GET /health` and `POST /predict`.
//!
//! The router carries an [`AppState`] holding the shared pipeline, or `None`
//! when the model failed to load at startup. A missing model is reported by
//! `/health` (503) and refused by `/predict` (503); the process keeps serving.

use crate::error::RiskError;
use crate::predict::RiskPipeline;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, Level};

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub pipeline: Option<Arc<RiskPipeline>>,
}

impl AppState {
    pub fn new(pipeline: Option<Arc<RiskPipeline>>) -> Self {
        Self { pipeline }
    }

    pub fn model_loaded(&self) -> bool {
        self.pipeline.is_some()
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.model_loaded() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                model_loaded: true,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                model_loaded: false,
            }),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(rename = "pdfUrl", default)]
    pub pdf_url: Option<String>,
}

pub async fn predict_handler(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Response, ApiError> {
    let pipeline = state.pipeline.as_ref().ok_or(ApiError::ModelNotLoaded)?;
    let result = pipeline.predict(request.pdf_url.as_deref()).await?;
    Ok(Json(result).into_response())
}

/// Error responses for `/predict`.
#[derive(Debug)]
pub enum ApiError {
    ModelNotLoaded,
    Risk(RiskError),
}

impl From<RiskError> for ApiError {
    fn from(err: RiskError) -> Self {
        Self::Risk(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ModelNotLoaded => {
                (StatusCode::SERVICE_UNAVAILABLE, "Model not loaded".to_string())
            }
            ApiError::Risk(err) => {
                error!("Prediction failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = serde_json::json!({ "success": false, "error": message });
        (status, Json(body)).into_response()
    }
}
