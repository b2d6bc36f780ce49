//! Prediction request/response types.
//!
//! `PredictorInput` is the fixed-key record handed to the premium model.
//! `Prediction` is what comes back, and `Quote` ties both to the profile that
//! produced them.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{
    AgeGroup, BmiCategory, CityTier, DerivedFeatures, LifestyleRisk, Occupation, UserProfile,
};

/// Errors raised at the predictor boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictorError {
    #[error("Model not loaded: {0}")]
    ModelNotLoaded(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Model integrity check failed: expected sha256 {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    #[error("Predictor did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Predictor unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed predictor output: {0}")]
    MalformedOutput(String),
}

/// The record sent to the predictor. Serializes to exactly the keys
/// `bmi`, `age_group`, `lifestyle_risk`, `city_tier`, `income_lpa`, `occupation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorInput {
    pub bmi: f64,
    pub age_group: AgeGroup,
    pub lifestyle_risk: LifestyleRisk,
    pub city_tier: CityTier,
    pub income_lpa: f64,
    pub occupation: Occupation,
}

impl PredictorInput {
    #[must_use]
    pub fn new(profile: &UserProfile, features: &DerivedFeatures) -> Self {
        Self {
            bmi: features.bmi(),
            age_group: features.age_group(),
            lifestyle_risk: features.lifestyle_risk(),
            city_tier: features.city_tier(),
            income_lpa: profile.income_lpa(),
            occupation: profile.occupation(),
        }
    }
}

/// Predictor output. Only `predicted_category` is required; unknown keys are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub class_probabilities: BTreeMap<String, f64>,
}

impl Prediction {
    /// A prediction carrying only a category label.
    #[must_use]
    pub fn category(label: impl Into<String>) -> Self {
        Self {
            predicted_category: label.into(),
            confidence: None,
            class_probabilities: BTreeMap::new(),
        }
    }

    /// Reject output no caller could display.
    ///
    /// # Errors
    /// Returns `PredictorError::MalformedOutput` for an empty category, a
    /// confidence outside `[0, 1]`, or a non-finite probability.
    pub fn validate(&self) -> Result<(), PredictorError> {
        if self.predicted_category.trim().is_empty() {
            return Err(PredictorError::MalformedOutput(
                "predicted_category is empty".to_string(),
            ));
        }
        if let Some(c) = self.confidence {
            if !(0.0..=1.0).contains(&c) {
                return Err(PredictorError::MalformedOutput(format!(
                    "confidence {c} outside [0, 1]"
                )));
            }
        }
        if let Some((class, p)) = self
            .class_probabilities
            .iter()
            .find(|(_, p)| !p.is_finite())
        {
            return Err(PredictorError::MalformedOutput(format!(
                "probability for {class} is {p}"
            )));
        }
        Ok(())
    }
}

/// A completed premium quote.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub profile: UserProfile,
    pub features: DerivedFeatures,
    pub request: PredictorInput,
    pub prediction: Prediction,
    pub bmi_category: BmiCategory,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Quote {
    #[must_use]
    pub fn new(
        profile: UserProfile,
        features: DerivedFeatures,
        request: PredictorInput,
        prediction: Prediction,
    ) -> Self {
        Self {
            bmi_category: features.bmi_category(),
            profile,
            features,
            request,
            prediction,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CityTiers, ProfileInput};

    fn reference_request() -> PredictorInput {
        let profile = UserProfile::new(&ProfileInput {
            age: 30,
            weight_kg: 90.0,
            height_m: 1.75,
            income_lpa: 12.0,
            is_smoker: true,
            city: "Mumbai".to_string(),
            occupation: "private_job".to_string(),
        })
        .expect("valid profile");
        let features = DerivedFeatures::derive(&profile, &CityTiers::default());
        PredictorInput::new(&profile, &features)
    }

    #[test]
    fn test_predictor_input_has_exact_keys() {
        let value = serde_json::to_value(reference_request()).expect("serialize");
        let object = value.as_object().expect("object");

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["age_group", "bmi", "city_tier", "income_lpa", "lifestyle_risk", "occupation"]
        );

        assert_eq!(object["age_group"], "adult");
        assert_eq!(object["lifestyle_risk"], "medium");
        assert_eq!(object["city_tier"], "tier_1");
        assert_eq!(object["occupation"], "private_job");
        assert_eq!(object["income_lpa"], 12.0);
        let bmi = object["bmi"].as_f64().expect("bmi number");
        assert!((bmi - 29.39).abs() < 0.01);
    }

    #[test]
    fn test_prediction_ignores_extra_keys() {
        let prediction: Prediction = serde_json::from_str(
            r#"{"predicted_category": "High", "model_version": "1.0.0"}"#,
        )
        .expect("parse");
        assert_eq!(prediction, Prediction::category("High"));
        assert!(prediction.validate().is_ok());
    }

    #[test]
    fn test_prediction_requires_category() {
        assert!(serde_json::from_str::<Prediction>(r#"{"confidence": 0.4}"#).is_err());
        assert!(matches!(
            Prediction::category("  ").validate(),
            Err(PredictorError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_prediction_rejects_bad_confidence() {
        let mut prediction = Prediction::category("Low");
        prediction.confidence = Some(1.5);
        assert!(prediction.validate().is_err());

        prediction.confidence = Some(0.8);
        prediction
            .class_probabilities
            .insert("Low".to_string(), f64::NAN);
        assert!(prediction.validate().is_err());
    }
}
