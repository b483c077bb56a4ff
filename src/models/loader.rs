//! ONNX model loader

use crate::config::ModelConfig;
use crate::models::classifier::{Classifier, ModelHandle};
use crate::models::onnx::OnnxClassifier;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Loader for ONNX models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        // Initialize ONNX Runtime
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load an ONNX classifier from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<OnnxClassifier> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let (label_output, probability_output) = select_outputs(&output_names);

        let model = OnnxClassifier::new(name, session, input_name, label_output, probability_output);

        info!(
            model = %model.name(),
            input = %model.input_name(),
            label_output = ?model.label_output(),
            probability_output = ?model.probability_output(),
            "Model loaded successfully"
        );

        Ok(model)
    }

    /// Load a model, logging and returning `None` on any failure
    pub fn load_or_absent<P: AsRef<Path>>(&self, path: P) -> ModelHandle {
        let path = path.as_ref();

        if !model_file_exists(path) {
            return None;
        }

        match self.load_model(path) {
            Ok(model) => Some(Arc::new(model) as Arc<dyn Classifier>),
            Err(e) => {
                error!(path = %path.display(), error = %format!("{:#}", e), "Failed to load model");
                None
            }
        }
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self { onnx_threads: 1 }
    }
}

/// Load the configured model. Never fails: every error path yields an absent handle.
pub fn load_model_handle(config: &ModelConfig) -> ModelHandle {
    let path = Path::new(&config.path);

    // Nothing to load: leave the runtime uninitialized
    if !model_file_exists(path) {
        return None;
    }

    match ModelLoader::with_threads(config.intra_threads) {
        Ok(loader) => loader.load_or_absent(path),
        Err(e) => {
            error!(error = %e, "Failed to initialize ONNX Runtime");
            None
        }
    }
}

fn model_file_exists(path: &Path) -> bool {
    let exists = path.exists();
    if !exists {
        error!(path = %path.display(), "Model file not found");
    }
    exists
}

fn is_probability_name(name: &str) -> bool {
    name.to_lowercase().contains("prob")
}

/// Pick the label and probability outputs from the graph's output names.
///
/// The label is the output whose name contains "label", else the first output
/// that is not a probability output. Probabilities come from an output whose
/// name contains "prob".
fn select_outputs(names: &[String]) -> (Option<String>, Option<String>) {
    let label = names
        .iter()
        .find(|n| n.to_lowercase().contains("label"))
        .or_else(|| names.iter().find(|n| !is_probability_name(n)))
        .cloned();

    let probability = names
        .iter()
        .find(|n| is_probability_name(n) && Some(*n) != label.as_ref())
        .cloned();

    (label, probability)
}
