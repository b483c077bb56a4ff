//! ML model loading and inference components

pub mod classifier;
pub mod inference;
pub mod loader;
pub mod onnx;

pub use classifier::{Classifier, ModelHandle, PredictError};
pub use inference::InferenceEngine;
pub use loader::{load_model_handle, ModelLoader};
pub use onnx::OnnxClassifier;
