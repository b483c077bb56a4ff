//! Type definitions for the diabetes prediction service

pub mod features;
pub mod prediction;

pub use features::{FeatureVector, RawFeatures, RawValue, FEATURE_NAMES};
pub use prediction::{Label, PredictionOutcome, MODEL_UNAVAILABLE_MESSAGE, NOT_FITTED_MESSAGE};
