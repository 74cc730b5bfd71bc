//! ML model loading and inference

pub mod inference;
pub mod linear;
pub mod loader;

pub use inference::{ClassScore, Classifier, InferenceEngine, OnnxClassifier};
pub use linear::LogisticRegression;
pub use loader::ModelLoader;
