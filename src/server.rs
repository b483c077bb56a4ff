//! HTTP server: prediction form, JSON API and health probes

use crate::models::inference::InferenceEngine;
use crate::types::features::{FeatureVector, RawFeatures};
use crate::types::prediction::{Label, PredictionOutcome};
use crate::ui;
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
}

/// JSON prediction response
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Same text the form shows
    pub result: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,
}

impl From<&PredictionOutcome> for PredictResponse {
    fn from(outcome: &PredictionOutcome) -> Self {
        let features = match outcome {
            PredictionOutcome::Predicted { features, .. } => Some(*features),
            _ => None,
        };

        Self {
            result: outcome.to_string(),
            outcome: outcome.kind().to_string(),
            label: outcome.label(),
            probability: outcome.probability(),
            features,
        }
    }
}

/// Readiness probe body
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Build the application router
pub fn router(engine: Arc<InferenceEngine>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/predict", post(predict_form_handler))
        .route("/api/predict", post(predict_api_handler))
        .route("/healthz", get(liveness_handler))
        .route("/readyz", get(readiness_handler))
        .with_state(AppState { engine })
}

/// Prediction web server
pub struct PredictionServer {
    engine: Arc<InferenceEngine>,
    addr: SocketAddr,
}

impl PredictionServer {
    pub fn new(engine: Arc<InferenceEngine>, addr: SocketAddr) -> Self {
        Self { engine, addr }
    }

    /// Serve until ctrl-c
    pub async fn run(&self) -> Result<()> {
        let app = router(Arc::clone(&self.engine));

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.addr))?;
        info!("Prediction server listening on {}", self.addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Prediction server error")?;

        info!("Prediction server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Run inference off the async executor
async fn evaluate(engine: Arc<InferenceEngine>, raw: RawFeatures) -> PredictionOutcome {
    tokio::task::spawn_blocking(move || engine.evaluate(&raw))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Inference task failed");
            PredictionOutcome::Failed {
                reason: e.to_string(),
            }
        })
}

/// Form page; query parameters named after features pre-fill the inputs
async fn index_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let raw = RawFeatures::from_pairs(params);
    Html(ui::render_page(
        &ui::form_values(&raw),
        None,
        state.engine.is_model_loaded(),
    ))
}

/// Form submission; re-renders the page with the result
async fn predict_form_handler(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let raw = RawFeatures::from_pairs(fields);
    let values = ui::form_values(&raw);
    let outcome = evaluate(Arc::clone(&state.engine), raw).await;

    Html(ui::render_page(
        &values,
        Some(&outcome.to_string()),
        state.engine.is_model_loaded(),
    ))
}

async fn predict_api_handler(
    State(state): State<AppState>,
    Json(raw): Json<RawFeatures>,
) -> impl IntoResponse {
    let outcome = evaluate(Arc::clone(&state.engine), raw).await;
    Json(PredictResponse::from(&outcome))
}

/// Liveness probe - is the process alive?
async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe - is a model loaded?
async fn readiness_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = ReadinessResponse {
        model_loaded: state.engine.is_model_loaded(),
        model: state.engine.model_name().map(str::to_string),
    };
    let status = if body.model_loaded {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}
