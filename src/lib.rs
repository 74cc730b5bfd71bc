//! Depression Predictor Library
//!
//! Serves a single-page form that collects ten student attributes, runs a
//! pre-trained binary classifier on them and reports a risk statement.

pub mod config;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use feature_extractor::{FeatureExtractor, FEATURE_COLUMNS};
pub use models::inference::InferenceEngine;
pub use types::{outcome::Prediction, record::InputRecord};
