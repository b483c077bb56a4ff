//! Diabetes Prediction Service Library
//!
//! Loads a pre-trained binary classifier exported to ONNX and serves a web
//! form that runs it on eight numeric patient features.

pub mod config;
pub mod feature_extractor;
pub mod logging;
pub mod models;
pub mod server;
pub mod types;
pub mod ui;

pub use config::AppConfig;
pub use feature_extractor::FeatureExtractor;
pub use models::inference::InferenceEngine;
pub use server::PredictionServer;
pub use types::{features::FeatureVector, features::RawFeatures, prediction::PredictionOutcome};
