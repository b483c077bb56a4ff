//! Prediction outcome data structures

use crate::types::features::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown on every request while no model is loaded
pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Model not loaded. Upload the model file and redeploy.";

/// Shown when the artifact carries no fitted estimator
pub const NOT_FITTED_MESSAGE: &str = "Model is not fitted. Please re-save a fitted model.";

/// Predicted class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    /// Class 1 is the disease-present class; everything else is negative
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Marker that leads the rendered result
    pub fn marker(&self) -> &'static str {
        match self {
            Label::Positive => "🔴 Positive",
            Label::Negative => "🟢 Negative",
        }
    }
}

/// Result of one prediction request
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// No model handle was loaded at startup
    ModelUnavailable,
    /// The model reported that it was never fitted
    NotFitted,
    /// Label prediction failed
    Failed { reason: String },
    /// Label prediction succeeded
    Predicted {
        label: Label,
        /// Positive class probability, when the model could provide one
        probability: Option<f64>,
        features: FeatureVector,
    },
}

impl PredictionOutcome {
    /// Short machine-readable kind, used by the JSON API and in logs
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionOutcome::ModelUnavailable => "model_unavailable",
            PredictionOutcome::NotFitted => "not_fitted",
            PredictionOutcome::Failed { .. } => "failed",
            PredictionOutcome::Predicted { .. } => "predicted",
        }
    }

    pub fn label(&self) -> Option<Label> {
        match self {
            PredictionOutcome::Predicted { label, .. } => Some(*label),
            _ => None,
        }
    }

    pub fn probability(&self) -> Option<f64> {
        match self {
            PredictionOutcome::Predicted { probability, .. } => *probability,
            _ => None,
        }
    }
}

impl fmt::Display for PredictionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionOutcome::ModelUnavailable => f.write_str(MODEL_UNAVAILABLE_MESSAGE),
            PredictionOutcome::NotFitted => f.write_str(NOT_FITTED_MESSAGE),
            PredictionOutcome::Failed { reason } => write!(f, "Prediction failed: {}", reason),
            PredictionOutcome::Predicted {
                label,
                probability,
                features,
            } => {
                f.write_str(label.marker())?;
                if let Some(p) = probability {
                    write!(f, "\nProbability (positive): {:.3}", p)?;
                }
                write!(f, "\n\nInput: {}", features)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class() {
        assert_eq!(Label::from_class(1), Label::Positive);
        assert_eq!(Label::from_class(0), Label::Negative);
        assert_eq!(Label::from_class(2), Label::Negative);
    }

    #[test]
    fn test_predicted_rendering() {
        let outcome = PredictionOutcome::Predicted {
            label: Label::Positive,
            probability: Some(0.8),
            features: FeatureVector::default(),
        };

        let text = outcome.to_string();
        assert!(text.starts_with("🔴 Positive\nProbability (positive): 0.800\n\nInput: {"));
    }

    #[test]
    fn test_probability_line_omitted() {
        let outcome = PredictionOutcome::Predicted {
            label: Label::Negative,
            probability: None,
            features: FeatureVector::default(),
        };

        let text = outcome.to_string();
        assert!(text.starts_with("🟢 Negative\n\nInput: "));
        assert!(!text.contains("Probability"));
    }

    #[test]
    fn test_failure_rendering() {
        assert_eq!(
            PredictionOutcome::ModelUnavailable.to_string(),
            MODEL_UNAVAILABLE_MESSAGE
        );
        assert_eq!(PredictionOutcome::NotFitted.to_string(), NOT_FITTED_MESSAGE);
        assert_eq!(
            PredictionOutcome::Failed {
                reason: "shape mismatch".to_string()
            }
            .to_string(),
            "Prediction failed: shape mismatch"
        );
    }
}
