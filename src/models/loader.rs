//! Model artifact loader

use crate::models::inference::{Classifier, OnnxClassifier};
use crate::models::linear::LogisticRegression;
use anyhow::{bail, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loaded ONNX model with metadata
pub struct LoadedModel {
    /// Model name
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the model
    pub input_name: String,
    /// Output name for the predicted class, if exported
    pub label_name: Option<String>,
    /// Output name for probabilities
    pub output_name: String,
}

/// Loader for the trained classifier
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier at `path`, choosing the format by extension.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Box<dyn Classifier>> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("Model file not found: {}", path.display());
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("onnx") => {
                let model = self.load_onnx(path, &name)?;
                Ok(Box::new(OnnxClassifier::new(model)))
            }
            Some("json") => {
                info!(model = %name, path = %path.display(), "Loading logistic regression coefficients");
                Ok(Box::new(LogisticRegression::load(path, &name)?))
            }
            _ => bail!(
                "Unsupported model format for {} (expected .onnx or .json)",
                path.display()
            ),
        }
    }

    /// Load a single ONNX model from file
    pub fn load_onnx<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<LoadedModel> {
        let path = path.as_ref();

        ort::init().commit()?;
        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        let output_name =
            probability_output_name(session.outputs.iter().map(|o| o.name.as_str()));

        info!(
            model = %name,
            input = %input_name,
            label = ?label_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name: name.to_string(),
            session,
            input_name,
            label_name,
            output_name,
        })
    }
}

/// Pick the probability output: a `prob*` name first, otherwise the last
/// output that is not the `label`.
fn probability_output_name<'a>(names: impl Iterator<Item = &'a str> + Clone) -> String {
    names
        .clone()
        .find(|name| name.contains("prob"))
        .or_else(|| names.filter(|name| !name.contains("label")).last())
        .unwrap_or("probabilities")
        .to_string()
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}
