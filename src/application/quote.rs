//! Quote service: Orchestrates a single premium prediction.
//!
//! validate -> derive -> build predictor record -> predict -> check output.
//! Each call is independent and the service keeps no mutable state, so one
//! instance can be shared across threads.

use std::sync::Arc;

use crate::domain::{
    CityTiers, DerivedFeatures, PredictorInput, ProfileInput, Quote, UserProfile,
    ValidationErrors,
};
use crate::ports::Predictor;
use crate::InsuranceError;

/// Service producing premium quotes from raw profile input.
pub struct PremiumService<P>
where
    P: Predictor,
{
    predictor: Arc<P>,
    city_tiers: Arc<CityTiers>,
}

impl<P> PremiumService<P>
where
    P: Predictor,
{
    pub fn new(predictor: Arc<P>, city_tiers: Arc<CityTiers>) -> Self {
        Self {
            predictor,
            city_tiers,
        }
    }

    #[must_use]
    pub fn city_tiers(&self) -> &CityTiers {
        &self.city_tiers
    }

    /// Validate raw input.
    ///
    /// # Errors
    /// Returns every constraint violation.
    pub fn profile(&self, input: &ProfileInput) -> Result<UserProfile, ValidationErrors> {
        UserProfile::new(input)
    }

    #[must_use]
    pub fn derive(&self, profile: &UserProfile) -> DerivedFeatures {
        DerivedFeatures::derive(profile, &self.city_tiers)
    }

    /// The record the predictor receives for `profile`.
    #[must_use]
    pub fn request_for(&self, profile: &UserProfile) -> PredictorInput {
        PredictorInput::new(profile, &self.derive(profile))
    }

    /// Run the prediction for an already validated profile.
    ///
    /// # Errors
    /// Returns `InsuranceError::Predictor` if the predictor fails or returns
    /// output that does not pass `Prediction::validate`.
    pub fn quote_profile(&self, profile: UserProfile) -> Result<Quote, InsuranceError> {
        let features = self.derive(&profile);
        let request = PredictorInput::new(&profile, &features);

        tracing::debug!(
            age_group = %request.age_group,
            lifestyle_risk = %request.lifestyle_risk,
            city_tier = %features.city_tier(),
            occupation = %request.occupation,
            "Sending request to predictor"
        );

        let prediction = self.predictor.predict(&request)?;
        prediction.validate()?;

        tracing::info!(
            "Quote complete: category={}, confidence={}",
            prediction.predicted_category,
            prediction
                .confidence
                .map_or_else(|| "n/a".to_string(), |c| format!("{:.1}%", c * 100.0))
        );

        Ok(Quote::new(profile, features, request, prediction))
    }

    /// Validate `input` and run the prediction.
    ///
    /// # Errors
    /// Returns `InsuranceError::Validation` or `InsuranceError::Predictor`.
    /// Nothing is retried.
    pub fn quote(&self, input: &ProfileInput) -> Result<Quote, InsuranceError> {
        let profile = self.profile(input).map_err(|e| {
            tracing::info!("Rejected profile: {} violation(s)", e.len());
            e
        })?;
        self.quote_profile(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AgeGroup, BmiCategory, CityTier, LifestyleRisk, Occupation, Prediction, PredictorError,
    };
    use std::sync::Mutex;

    /// Records every request and answers with a fixed result.
    struct StubPredictor {
        seen: Mutex<Vec<PredictorInput>>,
        answer: Result<Prediction, PredictorError>,
    }

    impl StubPredictor {
        fn answering(answer: Result<Prediction, PredictorError>) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                answer,
            })
        }

        fn seen(&self) -> Vec<PredictorInput> {
            self.seen.lock().expect("lock").clone()
        }
    }

    impl Predictor for StubPredictor {
        fn predict(&self, input: &PredictorInput) -> Result<Prediction, PredictorError> {
            self.seen.lock().expect("lock").push(input.clone());
            self.answer.clone()
        }
    }

    fn reference_input() -> ProfileInput {
        ProfileInput {
            age: 30,
            weight_kg: 90.0,
            height_m: 1.75,
            income_lpa: 12.0,
            is_smoker: true,
            city: "Mumbai".to_string(),
            occupation: "private_job".to_string(),
        }
    }

    fn service(stub: &Arc<StubPredictor>) -> PremiumService<StubPredictor> {
        PremiumService::new(Arc::clone(stub), Arc::new(CityTiers::default()))
    }

    #[test]
    fn test_end_to_end_reference_profile() {
        let stub = StubPredictor::answering(Ok(Prediction::category("Medium")));
        let quote = service(&stub).quote(&reference_input()).expect("quote");

        let seen = stub.seen();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert!((request.bmi - 29.39).abs() < 0.01);
        assert_eq!(request.age_group, AgeGroup::Adult);
        assert_eq!(request.lifestyle_risk, LifestyleRisk::Medium);
        assert_eq!(request.city_tier, CityTier::Tier1);
        assert_eq!(request.income_lpa, 12.0);
        assert_eq!(request.occupation, Occupation::PrivateJob);

        let wire = serde_json::to_value(request).expect("serialize");
        assert_eq!(wire["age_group"], "adult");
        assert_eq!(wire["city_tier"], "tier_1");

        assert_eq!(&quote.request, request);
        assert_eq!(quote.prediction.predicted_category, "Medium");
        assert_eq!(quote.bmi_category, BmiCategory::Overweight);
        assert_eq!(quote.features.age_group(), AgeGroup::Adult);
    }

    #[test]
    fn test_validation_failure_skips_predictor() {
        let stub = StubPredictor::answering(Ok(Prediction::category("Low")));
        let mut input = reference_input();
        input.age = 121;

        let err = service(&stub).quote(&input).expect_err("should reject");
        match err {
            InsuranceError::Validation(errors) => assert_eq!(errors.first().field(), "age"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(stub.seen().is_empty());
    }

    #[test]
    fn test_predictor_failure_is_surfaced() {
        let stub = StubPredictor::answering(Err(PredictorError::Unavailable("down".into())));
        let err = service(&stub)
            .quote(&reference_input())
            .expect_err("should fail");
        assert!(matches!(
            err,
            InsuranceError::Predictor(PredictorError::Unavailable(_))
        ));
        assert_eq!(stub.seen().len(), 1);
    }

    #[test]
    fn test_malformed_prediction_is_rejected() {
        let stub = StubPredictor::answering(Ok(Prediction::category("")));
        let err = service(&stub)
            .quote(&reference_input())
            .expect_err("should fail");
        assert!(matches!(
            err,
            InsuranceError::Predictor(PredictorError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_request_for_tier_3_senior() {
        let stub = StubPredictor::answering(Ok(Prediction::category("High")));
        let svc = service(&stub);
        let mut input = reference_input();
        input.age = 60;
        input.city = "Shillong".to_string();
        input.is_smoker = false;
        input.weight_kg = 60.0;

        let profile = svc.profile(&input).expect("valid");
        let request = svc.request_for(&profile);
        assert_eq!(request.age_group, AgeGroup::Senior);
        assert_eq!(request.city_tier, CityTier::Tier3);
        assert_eq!(request.lifestyle_risk, LifestyleRisk::Low);
    }
}
