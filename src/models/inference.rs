//! Inference engine for depression risk prediction

use crate::config::AppConfig;
use crate::feature_extractor::FeatureExtractor;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::outcome::{Prediction, RiskLabel};
use crate::types::record::InputRecord;
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Raw classifier output for a single record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScore {
    /// Predicted class id (0 or 1 for a well-formed binary model)
    pub class: i64,
    /// Positive-class probability, if available
    pub probability: Option<f64>,
}

impl ClassScore {
    /// Class from probability with sklearn's argmax tie-break (0.5 -> class 0)
    pub fn from_probability(probability: f64) -> Self {
        Self {
            class: if probability > 0.5 { 1 } else { 0 },
            probability: Some(probability),
        }
    }

    /// Combine the ONNX `label` and probability outputs; the exported
    /// label wins, the probability is the fallback.
    pub fn resolve(label: Option<i64>, probability: Option<f64>) -> Result<Self> {
        match (label, probability) {
            (Some(class), probability) => Ok(Self { class, probability }),
            (None, Some(probability)) => Ok(Self::from_probability(probability)),
            (None, None) => Err(anyhow::anyhow!(
                "Model produced neither a label nor a probability"
            )),
        }
    }
}

/// A pre-trained binary classifier.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Predict the class of one feature vector.
    fn predict(&self, features: &[f32]) -> Result<ClassScore>;
}

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    name: String,
    /// `Session::run` needs `&mut`, so the session sits behind a lock
    model: Mutex<LoadedModel>,
}

impl OnnxClassifier {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            name: model.name.clone(),
            model: Mutex::new(model),
        }
    }

    /// Extract the predicted class from the `label` output
    fn extract_label(outputs: &ort::session::SessionOutputs, label_name: &str) -> Option<i64> {
        let output = outputs.get(label_name)?;
        let (_, data) = output.try_extract_tensor::<i64>().ok()?;
        data.first().copied()
    }

    /// Extract positive-class probability from model output.
    /// Handles both plain tensor outputs and seq(map) outputs (ZipMap).
    fn extract_probability(
        outputs: &ort::session::SessionOutputs,
        output_name: &str,
        model_name: &str,
    ) -> Option<f64> {
        if let Some(output) = outputs.get(output_name) {
            let dtype = output.dtype();

            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let dims: Vec<i64> = shape.iter().copied().collect();
                let prob = Self::positive_prob_from_tensor(&dims, data);
                debug!(model = %model_name, prob = prob, "Extracted from tensor");
                return Some(prob);
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(prob) = Self::extract_from_sequence_map(output, model_name) {
                    return Some(prob);
                }
            }
        }

        warn!(model = %model_name, output = %output_name, "Could not extract probability");
        None
    }

    /// Extract probability from seq(map(int64, float)) format
    fn extract_from_sequence_map(output: &ort::value::DynValue, model_name: &str) -> Result<f64> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
        let map_value = maps
            .first()
            .ok_or_else(|| anyhow::anyhow!("Empty sequence"))?;

        let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 1) {
            debug!(model = %model_name, prob = *prob, "Extracted from seq(map)");
            return Ok(*prob as f64);
        }
        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 0) {
            return Ok(1.0 - *prob as f64);
        }

        Err(anyhow::anyhow!("No probability found in map"))
    }

    /// Positive-class probability from a `[1, 2]`, `[2]` or single-value tensor
    fn positive_prob_from_tensor(dims: &[i64], data: &[f32]) -> f64 {
        let num_classes = dims.last().copied().unwrap_or(0);
        if num_classes >= 2 && data.len() >= 2 {
            data[1] as f64
        } else {
            data.first().map(|&v| v as f64).unwrap_or(0.5)
        }
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &[f32]) -> Result<ClassScore> {
        use ort::value::Tensor;

        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let mut model = self
            .model
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let LoadedModel {
            name,
            session,
            input_name,
            label_name,
            output_name,
        } = &mut *model;

        let outputs = session.run(ort::inputs![input_name.as_str() => input_tensor])?;

        let probability = Self::extract_probability(&outputs, output_name, name);
        let label = label_name
            .as_deref()
            .and_then(|label_name| Self::extract_label(&outputs, label_name));

        ClassScore::resolve(label, probability).with_context(|| format!("Model {}", name))
    }
}

/// Prediction entry point: record -> features -> classifier -> label
pub struct InferenceEngine {
    classifier: Box<dyn Classifier>,
    extractor: FeatureExtractor,
}

impl InferenceEngine {
    /// Create a new inference engine from configuration.
    ///
    /// Fails when the configured model file is missing or unreadable.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.model.onnx_threads);
        let classifier = loader
            .load(&config.model.path)
            .with_context(|| format!("Failed to load model {}", config.model.path.display()))?;

        info!(model = %classifier.name(), "Inference engine initialized");

        Ok(Self::from_classifier(classifier))
    }

    /// Wrap an already-loaded classifier
    pub fn from_classifier(classifier: Box<dyn Classifier>) -> Self {
        Self {
            classifier,
            extractor: FeatureExtractor::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    /// Run the classifier on one record and map its class to a risk label
    pub fn predict(&self, record: &InputRecord) -> Result<Prediction> {
        let features = self.extractor.extract(record);
        let score = self.classifier.predict(&features)?;
        let label = RiskLabel::from_class(score.class)?;
        let prediction = Prediction::new(label, score.probability);

        debug!(
            prediction_id = %prediction.prediction_id,
            model = %self.classifier.name(),
            label = ?prediction.label,
            probability = ?prediction.probability,
            "Prediction complete"
        );

        Ok(prediction)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::record::{Rating, YesNo};

    /// Deterministic stand-in: positive when suicidal thoughts and high
    /// financial stress are both reported.
    pub(crate) struct RuleClassifier;

    impl Classifier for RuleClassifier {
        fn name(&self) -> &str {
            "rule"
        }

        fn predict(&self, features: &[f32]) -> Result<ClassScore> {
            let positive = features[6] == 1.0 && features[8] >= 4.0;
            Ok(ClassScore {
                class: positive as i64,
                probability: None,
            })
        }
    }

    struct BrokenClassifier;

    impl Classifier for BrokenClassifier {
        fn name(&self) -> &str {
            "broken"
        }

        fn predict(&self, _features: &[f32]) -> Result<ClassScore> {
            Ok(ClassScore {
                class: 7,
                probability: None,
            })
        }
    }

    #[test]
    fn test_class_score_from_probability() {
        assert_eq!(ClassScore::from_probability(0.51).class, 1);
        assert_eq!(ClassScore::from_probability(0.5).class, 0);
        assert_eq!(ClassScore::from_probability(0.02).class, 0);
    }

    #[test]
    fn test_resolve_prefers_exported_label() {
        let score = ClassScore::resolve(Some(1), Some(0.2)).unwrap();
        assert_eq!(score.class, 1);
        assert_eq!(score.probability, Some(0.2));

        let score = ClassScore::resolve(Some(0), None).unwrap();
        assert_eq!(score, ClassScore { class: 0, probability: None });
    }

    #[test]
    fn test_resolve_falls_back_to_probability() {
        assert_eq!(ClassScore::resolve(None, Some(0.73)).unwrap().class, 1);
        assert_eq!(ClassScore::resolve(None, Some(0.5)).unwrap().class, 0);
    }

    #[test]
    fn test_resolve_without_outputs_fails() {
        let err = ClassScore::resolve(None, None).unwrap_err();
        assert!(err.to_string().contains("neither a label nor a probability"));
    }

    #[test]
    fn test_positive_prob_from_tensor_shapes() {
        // [batch, classes]
        assert_eq!(OnnxClassifier::positive_prob_from_tensor(&[1, 2], &[0.25, 0.75]), 0.75);
        // [classes]
        assert_eq!(OnnxClassifier::positive_prob_from_tensor(&[2], &[0.6, 0.4]), 0.4f32 as f64);
        // single probability
        assert_eq!(OnnxClassifier::positive_prob_from_tensor(&[1], &[0.9]), 0.9f32 as f64);
        assert_eq!(OnnxClassifier::positive_prob_from_tensor(&[1, 1], &[0.1]), 0.1f32 as f64);
        // empty output
        assert_eq!(OnnxClassifier::positive_prob_from_tensor(&[0], &[]), 0.5);
    }

    #[test]
    fn test_predict_maps_classes_to_messages() {
        let engine = InferenceEngine::from_classifier(Box::new(RuleClassifier));

        let low = engine.predict(&InputRecord::default()).unwrap();
        assert_eq!(low.label, RiskLabel::Lower);
        assert_eq!(
            low.message(),
            "The prediction indicates a lower likelihood of depression."
        );

        let record = InputRecord {
            suicidal_thoughts: YesNo::Yes,
            financial_stress: Rating::new(5),
            ..InputRecord::default()
        };
        let high = engine.predict(&record).unwrap();
        assert_eq!(high.label, RiskLabel::Higher);
        assert_eq!(
            high.message(),
            "The prediction indicates a higher likelihood of depression."
        );
    }

    #[test]
    fn test_predict_is_deterministic() {
        let engine = InferenceEngine::from_classifier(Box::new(RuleClassifier));
        let record = InputRecord {
            suicidal_thoughts: YesNo::Yes,
            financial_stress: Rating::new(4),
            ..InputRecord::default()
        };

        let first = engine.predict(&record).unwrap();
        let second = engine.predict(&record).unwrap();
        assert_eq!(first.message(), second.message());
        assert_ne!(first.prediction_id, second.prediction_id);
    }

    #[test]
    fn test_unexpected_class_is_an_error() {
        let engine = InferenceEngine::from_classifier(Box::new(BrokenClassifier));
        assert!(engine.predict(&InputRecord::default()).is_err());
    }

    #[test]
    fn test_engine_fails_without_model() {
        let mut config = AppConfig::default();
        config.model.path = "/nonexistent/model.onnx".into();
        assert!(InferenceEngine::new(&config).is_err());
    }
}
