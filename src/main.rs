//! Diabetes Prediction Service - Main Entry Point
//!
//! Loads the classifier once and serves the prediction form.

use anyhow::Result;
use diabetes_predictor::{
    config::AppConfig, logging::init_tracing, models::load_model_handle,
    models::inference::InferenceEngine, server::PredictionServer,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_tracing(&config.logging)?;

    info!("Starting Diabetes Prediction Service");
    info!(
        model_path = %config.model.path,
        port = config.server.port,
        "Configuration loaded successfully"
    );

    // A missing or unreadable model is not fatal; requests get a fixed message
    let handle = load_model_handle(&config.model);
    let engine = Arc::new(InferenceEngine::new(handle));

    match engine.model_name() {
        Some(name) => info!(model = %name, "Serving model"),
        None => warn!(
            model_path = %config.model.path,
            "No model loaded, predictions will report the model as unavailable"
        ),
    }

    let addr = config.server.bind_addr()?;
    PredictionServer::new(engine, addr).run().await?;

    Ok(())
}
