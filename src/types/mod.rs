//! Type definitions for the depression predictor

pub mod outcome;
pub mod record;

pub use outcome::{Prediction, RiskLabel};
pub use record::{Gender, InputRecord, Rating, RecordForm, YesNo};
