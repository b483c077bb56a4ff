//! Inference engine: raw inputs in, user-facing result out

use crate::feature_extractor::FeatureExtractor;
use crate::models::classifier::{ModelHandle, PredictError};
use crate::types::features::RawFeatures;
use crate::types::prediction::{Label, PredictionOutcome};
use tracing::{debug, info, warn};

/// Runs the loaded classifier on one set of patient inputs.
///
/// Never fails: every error condition is turned into a [`PredictionOutcome`].
pub struct InferenceEngine {
    /// Loaded model; `None` is a valid steady state
    model: ModelHandle,
    extractor: FeatureExtractor,
}

impl InferenceEngine {
    /// Create an inference engine around a (possibly absent) model handle
    pub fn new(model: ModelHandle) -> Self {
        let extractor = FeatureExtractor::new();

        info!(
            feature_count = extractor.feature_count(),
            features = ?extractor.feature_names(),
            model_loaded = model.is_some(),
            "Inference engine initialized"
        );

        Self { model, extractor }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.name())
    }

    /// Normalize the inputs and run the model
    pub fn evaluate(&self, raw: &RawFeatures) -> PredictionOutcome {
        let Some(model) = self.model.as_deref() else {
            return PredictionOutcome::ModelUnavailable;
        };

        let features = self.extractor.extract(raw);

        let class = match model.predict(&features) {
            Ok(class) => class,
            Err(PredictError::NotFitted) => {
                warn!(model = %model.name(), "Model is not fitted");
                return PredictionOutcome::NotFitted;
            }
            Err(e) => {
                warn!(model = %model.name(), error = %e, "Prediction failed");
                return PredictionOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        // Probability is optional; its errors only drop the line from the output
        let probability = if model.supports_probability() {
            model
                .predict_proba(&features)
                .ok()
                .and_then(|p| positive_probability(&p))
        } else {
            None
        };

        let label = Label::from_class(class);

        debug!(
            model = %model.name(),
            class = class,
            label = ?label,
            probability = ?probability,
            "Prediction complete"
        );

        PredictionOutcome::Predicted {
            label,
            probability,
            features,
        }
    }

    /// Run the model and render the result text
    pub fn predict(&self, raw: &RawFeatures) -> String {
        self.evaluate(raw).to_string()
    }
}

/// Positive class is the second entry of a two-or-more-class vector, else the sole entry
fn positive_probability(probabilities: &[f64]) -> Option<f64> {
    if probabilities.len() >= 2 {
        Some(probabilities[1])
    } else {
        probabilities.first().copied()
    }
}
