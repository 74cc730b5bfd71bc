//! Feature extraction for depression model inference.
//!
//! The column order here matches the dataframe the classifier was
//! trained on; changing it silently changes every prediction.

use crate::types::record::InputRecord;

/// Model column names, in training order.
pub const FEATURE_COLUMNS: [&str; 10] = [
    "Gender",
    "Age",
    "Academic Pressure",
    "Study Satisfaction",
    "Sleep Duration",
    "Dietary Habits",
    "Have you ever had suicidal thoughts ?",
    "Study Hours",
    "Financial Stress",
    "Family History of Mental Illness",
];

/// Feature extractor that transforms input records into model input features.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract features from a record.
    ///
    /// Returns ten values in [`FEATURE_COLUMNS`] order, with the
    /// categorical answers as their 0/1 codes.
    pub fn extract(&self, record: &InputRecord) -> Vec<f32> {
        vec![
            record.gender.code() as f32,
            record.age as f32,
            record.academic_pressure.get() as f32,
            record.study_satisfaction.get() as f32,
            record.sleep_duration as f32,
            record.dietary_habits.get() as f32,
            record.suicidal_thoughts.code() as f32,
            record.study_hours as f32,
            record.financial_stress.get() as f32,
            record.family_history.code() as f32,
        ]
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COLUMNS.len()
    }

    /// Get feature names (training order).
    pub fn feature_names(&self) -> Vec<&'static str> {
        FEATURE_COLUMNS.to_vec()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::{Gender, Rating, YesNo};

    #[test]
    fn test_feature_extraction_order() {
        let extractor = FeatureExtractor::new();
        let record = InputRecord {
            gender: Gender::Female,
            age: 23,
            academic_pressure: Rating::new(5),
            study_satisfaction: Rating::new(2),
            sleep_duration: 6.5,
            dietary_habits: Rating::new(1),
            suicidal_thoughts: YesNo::Yes,
            study_hours: 9,
            financial_stress: Rating::new(4),
            family_history: YesNo::No,
        };

        let features = extractor.extract(&record);

        assert_eq!(features.len(), extractor.feature_count());
        assert_eq!(
            features,
            vec![1.0, 23.0, 5.0, 2.0, 6.5, 1.0, 1.0, 9.0, 4.0, 0.0]
        );
    }

    #[test]
    fn test_feature_count() {
        let extractor = FeatureExtractor::new();
        assert_eq!(extractor.feature_count(), 10);
        assert_eq!(extractor.feature_names().len(), 10);
        assert_eq!(extractor.feature_names()[6], "Have you ever had suicidal thoughts ?");
    }
}
