//! Feature extraction for diabetes model inference.
//!
//! Turns raw form/API values into the fixed-order numeric row the
//! classifier was trained on.

use crate::types::features::{FeatureVector, RawFeatures, RawValue, FEATURE_NAMES};

/// Feature extractor that normalizes raw patient inputs into model input features.
///
/// Missing or unparseable values become 0. Column order always follows
/// [`FEATURE_NAMES`], regardless of the order values arrived in.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract a feature vector from raw inputs.
    pub fn extract(&self, raw: &RawFeatures) -> FeatureVector {
        FeatureVector {
            pregnancies: coerce(raw.pregnancies.as_ref()),
            glucose: coerce(raw.glucose.as_ref()),
            blood_pressure: coerce(raw.blood_pressure.as_ref()),
            skin_thickness: coerce(raw.skin_thickness.as_ref()),
            insulin: coerce(raw.insulin.as_ref()),
            bmi: coerce(raw.bmi.as_ref()),
            diabetes_pedigree_function: coerce(raw.diabetes_pedigree_function.as_ref()),
            age: coerce(raw.age.as_ref()),
        }
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_NAMES.len()
    }

    /// Get feature names (matching training order).
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn coerce(value: Option<&RawValue>) -> f64 {
    value.map(RawValue::coerce).unwrap_or(0.0)
}
