//! Classifier abstraction shared by the loader and the inference engine

use crate::types::features::FeatureVector;
use std::sync::Arc;
use thiserror::Error;

/// Errors a classifier can report for a single prediction
#[derive(Debug, Error)]
pub enum PredictError {
    /// The artifact holds no fitted estimator
    #[error("model is not fitted")]
    NotFitted,

    #[error("{0}")]
    Inference(String),

    #[error("model output '{0}' not found")]
    MissingOutput(String),

    #[error("unsupported model output: {0}")]
    UnsupportedOutput(String),
}

/// A pre-trained binary classifier over one feature vector
pub trait Classifier: Send + Sync {
    /// Human-readable model name, used in logs
    fn name(&self) -> &str;

    /// Predict the class label
    fn predict(&self, features: &FeatureVector) -> Result<i64, PredictError>;

    /// Whether [`Classifier::predict_proba`] is backed by a probability output
    fn supports_probability(&self) -> bool {
        false
    }

    /// Per-class probabilities ordered by class id
    fn predict_proba(&self, _features: &FeatureVector) -> Result<Vec<f64>, PredictError> {
        Err(PredictError::UnsupportedOutput(
            "probability estimation not available".to_string(),
        ))
    }
}

/// Loaded model, or `None` when the artifact could not be loaded at startup
pub type ModelHandle = Option<Arc<dyn Classifier>>;
