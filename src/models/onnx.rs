//! ONNX-backed classifier

use crate::models::classifier::{Classifier, PredictError};
use crate::types::features::FeatureVector;
use ort::memory::Allocator;
use ort::session::Session;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::sync::Mutex;
use tracing::debug;

impl From<ort::Error> for PredictError {
    fn from(e: ort::Error) -> Self {
        PredictError::Inference(e.to_string())
    }
}

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    /// Model name (file stem)
    name: String,
    /// Running a session needs exclusive access
    session: Mutex<Session>,
    /// Input name for the model
    input_name: String,
    /// Output carrying the predicted class; `None` if no output can hold one
    label_output: Option<String>,
    /// Output carrying class probabilities
    probability_output: Option<String>,
}

impl OnnxClassifier {
    pub fn new(
        name: String,
        session: Session,
        input_name: String,
        label_output: Option<String>,
        probability_output: Option<String>,
    ) -> Self {
        Self {
            name,
            session: Mutex::new(session),
            input_name,
            label_output,
            probability_output,
        }
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn label_output(&self) -> Option<&str> {
        self.label_output.as_deref()
    }

    pub fn probability_output(&self) -> Option<&str> {
        self.probability_output.as_deref()
    }

    /// Run the session and hand the named output to `extract`
    fn run_output<T>(
        &self,
        features: &FeatureVector,
        output_name: &str,
        extract: impl FnOnce(&ort::value::DynValue) -> Result<T, PredictError>,
    ) -> Result<T, PredictError> {
        let row = features.to_row();

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, row.len() as i64];
        let input_tensor = Tensor::from_array((shape, row))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| PredictError::Inference(format!("Lock error: {}", e)))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        let output = outputs
            .get(output_name)
            .ok_or_else(|| PredictError::MissingOutput(output_name.to_string()))?;

        let value = extract(output)?;
        Ok(value)
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64, PredictError> {
        let label_output =
            resolve_label(self.label_output.as_deref(), self.probability_output.as_deref())?;
        let class = self.run_output(features, label_output, extract_label)?;
        debug!(model = %self.name, class = class, "Extracted label");
        Ok(class)
    }

    fn supports_probability(&self) -> bool {
        self.probability_output.is_some()
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, PredictError> {
        let probability_output = self.probability_output.as_deref().ok_or_else(|| {
            PredictError::UnsupportedOutput("model has no probability output".to_string())
        })?;
        self.run_output(features, probability_output, extract_probabilities)
    }
}

/// A graph without outputs was never fitted; one with only probabilities has no label
fn resolve_label<'a>(
    label_output: Option<&'a str>,
    probability_output: Option<&str>,
) -> Result<&'a str, PredictError> {
    match (label_output, probability_output) {
        (Some(label), _) => Ok(label),
        (None, Some(_)) => Err(PredictError::MissingOutput("label".to_string())),
        (None, None) => Err(PredictError::NotFitted),
    }
}

/// Extract the class label from an int64 (sklearn-onnx) or float tensor
fn extract_label(output: &ort::value::DynValue) -> Result<i64, PredictError> {
    if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
        return data
            .first()
            .copied()
            .ok_or_else(|| PredictError::UnsupportedOutput("empty label tensor".to_string()));
    }

    if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
        return data
            .first()
            .map(|&v| v as i64)
            .ok_or_else(|| PredictError::UnsupportedOutput("empty label tensor".to_string()));
    }

    Err(PredictError::UnsupportedOutput(format!(
        "label output has type {:?}",
        output.dtype()
    )))
}

/// Extract per-class probabilities.
/// Handles tensor outputs (sklearn, XGBoost) and seq(map) outputs (LightGBM, zipmap).
fn extract_probabilities(output: &ort::value::DynValue) -> Result<Vec<f64>, PredictError> {
    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        // [batch, num_classes] or [num_classes]; only the first row matters
        let width = match dims.as_slice() {
            [_, classes] => (*classes).max(0) as usize,
            _ => data.len(),
        };
        return Ok(data.iter().take(width).map(|&v| v as f64).collect());
    }

    let dtype = output.dtype();
    if DynSequenceValueType::can_downcast(&dtype) {
        return extract_from_sequence_map(output);
    }

    Err(PredictError::UnsupportedOutput(format!(
        "probability output has type {:?}",
        dtype
    )))
}

/// Extract probabilities from seq(map(int64, float)), ordered by class id
fn extract_from_sequence_map(output: &ort::value::DynValue) -> Result<Vec<f64>, PredictError> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| PredictError::UnsupportedOutput(format!("not a sequence: {}", e)))?;

    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

    // batch size is always 1
    let map_value = maps
        .first()
        .ok_or_else(|| PredictError::UnsupportedOutput("empty sequence".to_string()))?;

    let mut kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;
    kv_pairs.sort_by_key(|(class_id, _)| *class_id);

    Ok(kv_pairs.into_iter().map(|(_, prob)| prob as f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_label() {
        assert_eq!(resolve_label(Some("label"), Some("probabilities")).unwrap(), "label");
        assert_eq!(resolve_label(Some("variable"), None).unwrap(), "variable");
    }

    #[test]
    fn test_resolve_label_without_outputs_is_not_fitted() {
        assert!(matches!(
            resolve_label(None, None),
            Err(PredictError::NotFitted)
        ));
    }

    #[test]
    fn test_resolve_label_probabilities_only() {
        let err = resolve_label(None, Some("probabilities")).unwrap_err();
        assert!(matches!(err, PredictError::MissingOutput(ref name) if name == "label"));
        assert_eq!(err.to_string(), "model output 'label' not found");
    }
}
