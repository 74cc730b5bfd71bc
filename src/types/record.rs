//! Input record collected from the form

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;

/// Gender as encoded for the model (Male = 0, Female = 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// Parse the form label ("Male" / "Female")
    pub fn from_label(label: &str) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => bail!("Unknown gender '{}'", other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Yes/No answer encoded as No = 0, Yes = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YesNo {
    #[default]
    No,
    Yes,
}

impl YesNo {
    /// Parse the form label ("No" / "Yes")
    pub fn from_label(label: &str) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "no" => Ok(YesNo::No),
            "yes" => Ok(YesNo::Yes),
            other => bail!("Expected Yes or No, got '{}'", other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            YesNo::No => 0,
            YesNo::Yes => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            YesNo::No => "No",
            YesNo::Yes => "Yes",
        }
    }
}

/// A 1-5 slider rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Build a rating, clamping into [1, 5]
    pub fn new(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(3)
    }
}

pub const AGE_MIN: u32 = 1;
pub const AGE_MAX: u32 = 100;
/// Largest sleep duration that survives conversion to an f32 feature
pub const SLEEP_MAX: f64 = f32::MAX as f64;

/// The ten attributes fed to the classifier.
///
/// Field order follows the column order the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub gender: Gender,
    pub age: u32,
    pub academic_pressure: Rating,
    pub study_satisfaction: Rating,
    /// Hours per night
    pub sleep_duration: f64,
    pub dietary_habits: Rating,
    pub suicidal_thoughts: YesNo,
    pub study_hours: u32,
    pub financial_stress: Rating,
    pub family_history: YesNo,
}

impl Default for InputRecord {
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            age: 18,
            academic_pressure: Rating::default(),
            study_satisfaction: Rating::default(),
            sleep_duration: 7.0,
            dietary_habits: Rating::default(),
            suicidal_thoughts: YesNo::No,
            study_hours: 4,
            financial_stress: Rating::default(),
            family_history: YesNo::No,
        }
    }
}

impl InputRecord {
    /// Human-readable lines for the "Your Inputs Summary" panel
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Gender", self.gender.label().to_string()),
            ("Age", self.age.to_string()),
            ("Academic Pressure", self.academic_pressure.get().to_string()),
            ("Study Satisfaction", self.study_satisfaction.get().to_string()),
            ("Sleep Duration", format!("{:?} hours", self.sleep_duration)),
            ("Dietary Habits", self.dietary_habits.get().to_string()),
            ("Suicidal Thoughts", self.suicidal_thoughts.label().to_string()),
            ("Study Hours", format!("{} hours", self.study_hours)),
            ("Financial Stress", self.financial_stress.get().to_string()),
            ("Family History", self.family_history.label().to_string()),
        ]
    }
}

/// Raw form submission, before validation and clamping.
///
/// Every field is optional; missing fields take the form defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordForm {
    pub gender: Option<String>,
    pub age: Option<String>,
    pub academic_pressure: Option<String>,
    pub study_satisfaction: Option<String>,
    pub sleep_duration: Option<String>,
    pub dietary_habits: Option<String>,
    pub suicidal_thoughts: Option<String>,
    pub study_hours: Option<String>,
    pub financial_stress: Option<String>,
    pub family_history: Option<String>,
}

impl RecordForm {
    /// Validate the submission and build a clamped record
    pub fn into_record(self) -> Result<InputRecord> {
        Ok(InputRecord {
            gender: self.gender()?,
            age: self.age()?,
            academic_pressure: parse_rating(&self.academic_pressure, "Academic Pressure")?,
            study_satisfaction: parse_rating(&self.study_satisfaction, "Study Satisfaction")?,
            sleep_duration: self.sleep_duration()?,
            dietary_habits: parse_rating(&self.dietary_habits, "Dietary Habits")?,
            suicidal_thoughts: self.suicidal_thoughts()?,
            study_hours: self.study_hours()?,
            financial_stress: parse_rating(&self.financial_stress, "Financial Stress")?,
            family_history: self.family_history()?,
        })
    }

    /// Record for re-displaying a rejected submission: valid fields keep
    /// the submitted value, invalid ones fall back to the form default.
    pub fn best_effort(&self) -> InputRecord {
        let defaults = InputRecord::default();
        let rating = |value: &Option<String>| parse_rating(value, "").unwrap_or_default();

        InputRecord {
            gender: self.gender().unwrap_or(defaults.gender),
            age: self.age().unwrap_or(defaults.age),
            academic_pressure: rating(&self.academic_pressure),
            study_satisfaction: rating(&self.study_satisfaction),
            sleep_duration: self.sleep_duration().unwrap_or(defaults.sleep_duration),
            dietary_habits: rating(&self.dietary_habits),
            suicidal_thoughts: self.suicidal_thoughts().unwrap_or(defaults.suicidal_thoughts),
            study_hours: self.study_hours().unwrap_or(defaults.study_hours),
            financial_stress: rating(&self.financial_stress),
            family_history: self.family_history().unwrap_or(defaults.family_history),
        }
    }

    fn gender(&self) -> Result<Gender> {
        match present(&self.gender) {
            Some(label) => Gender::from_label(label),
            None => Ok(Gender::default()),
        }
    }

    fn age(&self) -> Result<u32> {
        match present(&self.age) {
            Some(raw) => Ok(parse_int(raw, "Age")?.clamp(AGE_MIN as i64, AGE_MAX as i64) as u32),
            None => Ok(InputRecord::default().age),
        }
    }

    fn sleep_duration(&self) -> Result<f64> {
        let Some(raw) = present(&self.sleep_duration) else {
            return Ok(InputRecord::default().sleep_duration);
        };

        let hours: f64 = raw
            .parse()
            .with_context(|| format!("Sleep Duration must be a number, got '{}'", raw))?;
        if !hours.is_finite() {
            bail!("Sleep Duration must be a finite number");
        }
        // Features are fed to the model as f32
        if hours > SLEEP_MAX {
            bail!("Sleep Duration must be at most {} hours", SLEEP_MAX);
        }
        Ok(hours.max(0.0))
    }

    fn study_hours(&self) -> Result<u32> {
        match present(&self.study_hours) {
            Some(raw) => Ok(parse_int(raw, "Study Hours")?.clamp(0, u32::MAX as i64) as u32),
            None => Ok(InputRecord::default().study_hours),
        }
    }

    fn suicidal_thoughts(&self) -> Result<YesNo> {
        match present(&self.suicidal_thoughts) {
            Some(label) => YesNo::from_label(label).context("Invalid answer for suicidal thoughts"),
            None => Ok(YesNo::default()),
        }
    }

    fn family_history(&self) -> Result<YesNo> {
        match present(&self.family_history) {
            Some(label) => YesNo::from_label(label).context("Invalid answer for family history"),
            None => Ok(YesNo::default()),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a whole number, saturating values outside the i64 range
fn parse_int(raw: &str, field: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(e).with_context(|| format!("{} must be a whole number, got '{}'", field, raw)),
        },
    }
}

fn parse_rating(value: &Option<String>, field: &str) -> Result<Rating> {
    match present(value) {
        Some(raw) => Ok(Rating::new(parse_int(raw, field)?)),
        None => Ok(Rating::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RecordForm {
        RecordForm {
            gender: Some("Female".to_string()),
            age: Some("21".to_string()),
            academic_pressure: Some("4".to_string()),
            study_satisfaction: Some("2".to_string()),
            sleep_duration: Some("5.5".to_string()),
            dietary_habits: Some("1".to_string()),
            suicidal_thoughts: Some("Yes".to_string()),
            study_hours: Some("10".to_string()),
            financial_stress: Some("5".to_string()),
            family_history: Some("No".to_string()),
        }
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::from_label("Female").unwrap().code(), 1);
        assert_eq!(Gender::from_label("Male").unwrap().code(), 0);
        assert_eq!(Gender::Female.label(), "Female");
        assert_eq!(Gender::Male.label(), "Male");
        for gender in [Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_label(gender.label()).unwrap(), gender);
        }
        assert!(Gender::from_label("other").is_err());
    }

    #[test]
    fn test_yes_no_codes() {
        assert_eq!(YesNo::from_label("yes").unwrap().code(), 1);
        assert_eq!(YesNo::from_label("No").unwrap().code(), 0);
        assert!(YesNo::from_label("maybe").is_err());
    }

    #[test]
    fn test_rating_clamps() {
        assert_eq!(Rating::new(-3).get(), 1);
        assert_eq!(Rating::new(0).get(), 1);
        assert_eq!(Rating::new(3).get(), 3);
        assert_eq!(Rating::new(9).get(), 5);
    }

    #[test]
    fn test_form_into_record() {
        let record = form().into_record().unwrap();
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.age, 21);
        assert_eq!(record.academic_pressure.get(), 4);
        assert_eq!(record.sleep_duration, 5.5);
        assert_eq!(record.suicidal_thoughts, YesNo::Yes);
        assert_eq!(record.study_hours, 10);
        assert_eq!(record.family_history, YesNo::No);
    }

    #[test]
    fn test_form_clamps_out_of_range_values() {
        let mut raw = form();
        raw.age = Some("250".to_string());
        raw.academic_pressure = Some("12".to_string());
        raw.financial_stress = Some("0".to_string());
        raw.sleep_duration = Some("-2".to_string());
        raw.study_hours = Some("-4".to_string());

        let record = raw.into_record().unwrap();
        assert_eq!(record.age, 100);
        assert_eq!(record.academic_pressure.get(), 5);
        assert_eq!(record.financial_stress.get(), 1);
        assert_eq!(record.sleep_duration, 0.0);
        assert_eq!(record.study_hours, 0);

        let mut young = form();
        young.age = Some("0".to_string());
        assert_eq!(young.into_record().unwrap().age, 1);
    }

    #[test]
    fn test_empty_form_uses_defaults() {
        let record = RecordForm::default().into_record().unwrap();
        assert_eq!(record, InputRecord::default());
    }

    #[test]
    fn test_form_rejects_garbage() {
        let mut raw = form();
        raw.age = Some("twenty".to_string());
        assert!(raw.into_record().is_err());

        let mut raw = form();
        raw.sleep_duration = Some("NaN".to_string());
        assert!(raw.into_record().is_err());

        let mut raw = form();
        raw.family_history = Some("sometimes".to_string());
        assert!(raw.into_record().is_err());
    }

    #[test]
    fn test_huge_sleep_duration_rejected() {
        let mut raw = form();
        raw.sleep_duration = Some("1e39".to_string());
        let err = raw.into_record().unwrap_err();
        assert!(err.to_string().contains("at most"));

        let mut raw = form();
        raw.sleep_duration = Some("1e30".to_string());
        let record = raw.into_record().unwrap();
        assert!((record.sleep_duration as f32).is_finite());
    }

    #[test]
    fn test_integer_overflow_saturates() {
        let mut raw = form();
        raw.study_hours = Some("99999999999999999999".to_string());
        raw.age = Some("-99999999999999999999".to_string());
        raw.dietary_habits = Some("99999999999999999999".to_string());

        let record = raw.into_record().unwrap();
        assert_eq!(record.study_hours, u32::MAX);
        assert_eq!(record.age, 1);
        assert_eq!(record.dietary_habits.get(), 5);
    }

    #[test]
    fn test_best_effort_keeps_valid_fields() {
        let mut raw = form();
        raw.gender = Some("Robot".to_string());
        raw.sleep_duration = Some("lots".to_string());

        let record = raw.best_effort();
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.sleep_duration, 7.0);
        assert_eq!(record.age, 21);
        assert_eq!(record.suicidal_thoughts, YesNo::Yes);
        assert_eq!(record.financial_stress.get(), 5);
    }

    #[test]
    fn test_summary_lines() {
        let summary = InputRecord::default().summary();
        assert_eq!(summary.len(), 10);
        assert_eq!(summary[0], ("Gender", "Male".to_string()));
        assert_eq!(summary[4], ("Sleep Duration", "7.0 hours".to_string()));
        assert_eq!(summary[7], ("Study Hours", "4 hours".to_string()));
        assert_eq!(summary[9], ("Family History", "No".to_string()));
    }
}
