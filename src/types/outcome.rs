//! Prediction outcome data structures

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary risk classification returned by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLabel {
    Lower,
    Higher,
}

impl RiskLabel {
    /// Map the classifier's class id (0 or 1) to a label
    pub fn from_class(class: i64) -> Result<Self> {
        match class {
            0 => Ok(RiskLabel::Lower),
            1 => Ok(RiskLabel::Higher),
            other => bail!("Classifier returned unexpected class {}", other),
        }
    }

    pub fn class(self) -> i64 {
        match self {
            RiskLabel::Lower => 0,
            RiskLabel::Higher => 1,
        }
    }

    /// Fixed statement shown to the user
    pub fn message(self) -> &'static str {
        match self {
            RiskLabel::Higher => "The prediction indicates a higher likelihood of depression.",
            RiskLabel::Lower => "The prediction indicates a lower likelihood of depression.",
        }
    }
}

/// Result of one prediction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Unique prediction identifier (for log correlation)
    pub prediction_id: String,

    /// Predicted class
    pub label: RiskLabel,

    /// Positive-class probability, when the model exposes one
    pub probability: Option<f64>,

    /// Prediction timestamp
    pub timestamp: DateTime<Utc>,
}

impl Prediction {
    pub fn new(label: RiskLabel, probability: Option<f64>) -> Self {
        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            label,
            probability,
            timestamp: Utc::now(),
        }
    }

    pub fn message(&self) -> &'static str {
        self.label.message()
    }
}
