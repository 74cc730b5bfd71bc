//! Logistic regression evaluated from exported coefficients

use crate::feature_extractor::FEATURE_COLUMNS;
use crate::models::inference::{ClassScore, Classifier};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk layout of a `.json` model artifact.
///
/// Mirrors sklearn's `coef_[0]` / `intercept_[0]` for a binary
/// `LogisticRegression`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelFile {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Column names the model was fitted on, if exported
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

/// Binary logistic regression classifier
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    name: String,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(name: &str, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        if coefficients.len() != FEATURE_COLUMNS.len() {
            bail!(
                "Model has {} coefficients, expected {}",
                coefficients.len(),
                FEATURE_COLUMNS.len()
            );
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            bail!("Model coefficients must be finite");
        }
        Ok(Self {
            name: name.to_string(),
            coefficients,
            intercept,
        })
    }

    /// Build from the JSON artifact, checking the exported column order
    pub fn from_file_contents(name: &str, file: LinearModelFile) -> Result<Self> {
        if let Some(columns) = &file.columns {
            if columns.iter().map(String::as_str).ne(FEATURE_COLUMNS.iter().copied()) {
                bail!(
                    "Model columns {:?} do not match expected order {:?}",
                    columns,
                    FEATURE_COLUMNS
                );
            }
        }
        Self::new(name, file.coefficients, file.intercept)
    }

    /// Load a `.json` coefficients file
    pub fn load<P: AsRef<Path>>(path: P, name: &str) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model from {}", path.display()))?;
        let file: LinearModelFile = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed model file {}", path.display()))?;
        Self::from_file_contents(name, file)
    }

    /// Positive-class probability, sigmoid(w.x + b)
    pub fn probability(&self, features: &[f32]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            bail!(
                "Expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            );
        }

        let z = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, &x)| w * x as f64)
            .sum::<f64>()
            + self.intercept;

        if !z.is_finite() {
            bail!("Decision function is not finite ({}); check the input features", z);
        }

        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &[f32]) -> Result<ClassScore> {
        let probability = self.probability(features)?;
        Ok(ClassScore::from_probability(probability))
    }
}
