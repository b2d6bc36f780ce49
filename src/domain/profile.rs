//! User profile types for premium category prediction.
//!
//! `ProfileInput` is what arrives from the form or a JSON file and carries no
//! guarantees. `UserProfile` can only be obtained by validating one, so every
//! value downstream of this module is within its documented bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Inclusive age bounds in years.
pub const AGE_RANGE: (i64, i64) = (1, 120);

/// Upper bound for weight in kilograms (lower bound is exclusive zero).
pub const MAX_WEIGHT_KG: f64 = 150.0;

/// Upper bound for height in meters (lower bound is exclusive zero).
pub const MAX_HEIGHT_M: f64 = 2.5;

/// Upper bound for income in lakhs per annum (lower bound is exclusive zero).
pub const MAX_INCOME_LPA: f64 = 100.0;

/// Maximum city name length, in characters.
pub const MAX_CITY_LEN: usize = 100;

/// Occupation categories understood by the premium model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Retired,
    Freelancer,
    Student,
    GovernmentJob,
    BusinessOwner,
    Unemployed,
    PrivateJob,
}

impl Occupation {
    /// All occupations, in the order the form presents them.
    pub const ALL: [Occupation; 7] = [
        Self::Retired,
        Self::Freelancer,
        Self::Student,
        Self::GovernmentJob,
        Self::BusinessOwner,
        Self::Unemployed,
        Self::PrivateJob,
    ];

    /// Wire name of the occupation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retired => "retired",
            Self::Freelancer => "freelancer",
            Self::Student => "student",
            Self::GovernmentJob => "government_job",
            Self::BusinessOwner => "business_owner",
            Self::Unemployed => "unemployed",
            Self::PrivateJob => "private_job",
        }
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Occupation {
    type Err = ValidationError;

    /// Case-sensitive match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownOccupation(s.to_string()))
    }
}

/// A single constraint violation on a raw profile field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("age must be between 1 and 120, got {0}")]
    AgeOutOfRange(i64),

    #[error("weight_kg must be greater than 0 and at most 150, got {0}")]
    WeightOutOfRange(f64),

    #[error("height_m must be greater than 0 and at most 2.5, got {0}")]
    HeightOutOfRange(f64),

    #[error("income_lpa must be greater than 0 and at most 100, got {0}")]
    IncomeOutOfRange(f64),

    #[error("city must be at most 100 characters, got {0}")]
    CityTooLong(usize),

    #[error(
        "occupation must be one of retired, freelancer, student, government_job, \
         business_owner, unemployed, private_job; got {0:?}"
    )]
    UnknownOccupation(String),

    #[error("{field} must be a number, got {input:?}")]
    NotANumber { field: &'static str, input: String },

    #[error("malformed profile: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// Name of the offending field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::AgeOutOfRange(_) => "age",
            Self::WeightOutOfRange(_) => "weight_kg",
            Self::HeightOutOfRange(_) => "height_m",
            Self::IncomeOutOfRange(_) => "income_lpa",
            Self::CityTooLong(_) => "city",
            Self::UnknownOccupation(_) => "occupation",
            Self::NotANumber { field, .. } => *field,
            Self::Malformed(_) => "profile",
        }
    }
}

/// Every violation found in one profile, in field order. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// The first violation.
    #[must_use]
    pub fn first(&self) -> &ValidationError {
        // Constructed only from a non-empty list.
        &self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any violation concerns `field`.
    #[must_use]
    #[cfg(test)]
    pub(crate) fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    pub(crate) fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw, unvalidated profile attributes as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub age: i64,
    #[serde(alias = "weight")]
    pub weight_kg: f64,
    #[serde(alias = "height")]
    pub height_m: f64,
    pub income_lpa: f64,
    #[serde(alias = "smoker")]
    pub is_smoker: bool,
    pub city: String,
    pub occupation: String,
}

/// A validated user profile.
///
/// Fields are private and there are no setters: a `UserProfile` is built once
/// per request and every value is guaranteed within bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileInput")]
pub struct UserProfile {
    age: u32,
    weight_kg: f64,
    height_m: f64,
    income_lpa: f64,
    is_smoker: bool,
    city: String,
    occupation: Occupation,
}

fn positive_at_most(value: f64, max: f64) -> bool {
    // NaN fails both comparisons.
    value > 0.0 && value <= max
}

impl UserProfile {
    /// Validate raw input, collecting every violation.
    ///
    /// # Errors
    /// Returns all constraint violations in field order.
    pub fn new(input: &ProfileInput) -> Result<Self, ValidationErrors> {
        let mut errors = Vec::new();

        if input.age < AGE_RANGE.0 || input.age > AGE_RANGE.1 {
            errors.push(ValidationError::AgeOutOfRange(input.age));
        }
        if !positive_at_most(input.weight_kg, MAX_WEIGHT_KG) {
            errors.push(ValidationError::WeightOutOfRange(input.weight_kg));
        }
        if !positive_at_most(input.height_m, MAX_HEIGHT_M) {
            errors.push(ValidationError::HeightOutOfRange(input.height_m));
        }
        if !positive_at_most(input.income_lpa, MAX_INCOME_LPA) {
            errors.push(ValidationError::IncomeOutOfRange(input.income_lpa));
        }

        let city_len = input.city.chars().count();
        if city_len > MAX_CITY_LEN {
            errors.push(ValidationError::CityTooLong(city_len));
        }

        let occupation = match input.occupation.parse::<Occupation>() {
            Ok(o) => Some(o),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        match (occupation, ValidationErrors::from_vec(errors)) {
            (Some(occupation), None) => Ok(Self {
                // Range-checked above.
                age: input.age as u32,
                weight_kg: input.weight_kg,
                height_m: input.height_m,
                income_lpa: input.income_lpa,
                is_smoker: input.is_smoker,
                city: input.city.clone(),
                occupation,
            }),
            (_, Some(errors)) => Err(errors),
            (None, None) => Err(ValidationError::UnknownOccupation(input.occupation.clone()).into()),
        }
    }

    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }

    #[must_use]
    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    #[must_use]
    pub fn height_m(&self) -> f64 {
        self.height_m
    }

    #[must_use]
    pub fn income_lpa(&self) -> f64 {
        self.income_lpa
    }

    #[must_use]
    pub fn is_smoker(&self) -> bool {
        self.is_smoker
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[must_use]
    pub fn occupation(&self) -> Occupation {
        self.occupation
    }
}

impl TryFrom<ProfileInput> for UserProfile {
    type Error = ValidationErrors;

    fn try_from(input: ProfileInput) -> Result<Self, Self::Error> {
        Self::new(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ProfileInput {
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

    fn rejects(mutate: impl FnOnce(&mut ProfileInput), field: &str) {
        let mut input = valid_input();
        mutate(&mut input);
        let errors = UserProfile::new(&input).expect_err("should reject");
        assert_eq!(errors.len(), 1, "unexpected errors: {errors}");
        assert_eq!(errors.first().field(), field);
    }

    #[test]
    fn test_valid_profile() {
        let profile = UserProfile::new(&valid_input()).expect("valid");
        assert_eq!(profile.age(), 30);
        assert_eq!(profile.occupation(), Occupation::PrivateJob);
        assert_eq!(profile.city(), "Mumbai");
        assert!(profile.is_smoker());
    }

    #[test]
    fn test_out_of_range_fields_are_named() {
        rejects(|i| i.age = 0, "age");
        rejects(|i| i.age = 121, "age");
        rejects(|i| i.weight_kg = 0.0, "weight_kg");
        rejects(|i| i.weight_kg = 151.0, "weight_kg");
        rejects(|i| i.height_m = 0.0, "height_m");
        rejects(|i| i.height_m = 2.6, "height_m");
        rejects(|i| i.income_lpa = 0.0, "income_lpa");
        rejects(|i| i.income_lpa = 101.0, "income_lpa");
        rejects(|i| i.occupation = "astronaut".to_string(), "occupation");
        rejects(|i| i.city = "x".repeat(101), "city");
    }

    #[test]
    fn test_inclusive_upper_bounds_accepted() {
        let mut input = valid_input();
        input.age = 120;
        input.weight_kg = 150.0;
        input.height_m = 2.5;
        input.income_lpa = 100.0;
        input.city = "y".repeat(100);
        assert!(UserProfile::new(&input).is_ok());

        input.age = 1;
        assert!(UserProfile::new(&input).is_ok());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        rejects(|i| i.weight_kg = f64::NAN, "weight_kg");
        rejects(|i| i.height_m = f64::INFINITY, "height_m");
        rejects(|i| i.income_lpa = f64::NAN, "income_lpa");
    }

    #[test]
    fn test_occupation_is_case_sensitive() {
        rejects(|i| i.occupation = "Private_Job".to_string(), "occupation");
        rejects(|i| i.occupation = " retired".to_string(), "occupation");
    }

    #[test]
    fn test_collects_all_violations_in_field_order() {
        let input = ProfileInput {
            age: 0,
            weight_kg: 200.0,
            height_m: 1.7,
            income_lpa: -1.0,
            is_smoker: false,
            city: "Pune".to_string(),
            occupation: "pilot".to_string(),
        };
        let errors = UserProfile::new(&input).expect_err("should reject");
        let fields: Vec<_> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, ["age", "weight_kg", "income_lpa", "occupation"]);
        assert!(errors.mentions("income_lpa"));
        assert!(!errors.mentions("city"));
    }

    #[test]
    fn test_error_message_states_bound() {
        let mut input = valid_input();
        input.age = 0;
        let errors = UserProfile::new(&input).expect_err("should reject");
        assert_eq!(errors.to_string(), "age must be between 1 and 120, got 0");
    }

    #[test]
    fn test_city_kept_verbatim_and_padding_counts() {
        let mut input = valid_input();
        input.city = format!("{} ", "x".repeat(MAX_CITY_LEN));
        let errors = UserProfile::new(&input).expect_err("101 chars");
        assert!(matches!(errors.first(), ValidationError::CityTooLong(101)));

        input.city = " Mumbai".to_string();
        let profile = UserProfile::new(&input).expect("valid");
        assert_eq!(profile.city(), " Mumbai");
        let features = crate::domain::DerivedFeatures::derive(&profile, &crate::domain::CityTiers::default());
        assert_eq!(features.city_tier(), crate::domain::CityTier::Tier3);

        input.city = String::new();
        assert!(UserProfile::new(&input).is_ok());
    }

    #[test]
    fn test_deserialize_goes_through_validation() {
        let ok: UserProfile = serde_json::from_str(
            r#"{"age":45,"weight":70.0,"height":1.6,"income_lpa":8.5,"smoker":false,
                "city":"Jaipur","occupation":"government_job"}"#,
        )
        .expect("valid json profile");
        assert_eq!(ok.occupation(), Occupation::GovernmentJob);

        let bad = serde_json::from_str::<UserProfile>(
            r#"{"age":130,"weight_kg":70.0,"height_m":1.6,"income_lpa":8.5,
                "is_smoker":false,"city":"Jaipur","occupation":"government_job"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_occupation_round_trips_wire_names() {
        for occupation in Occupation::ALL {
            assert_eq!(occupation.as_str().parse::<Occupation>(), Ok(occupation));
        }
    }
}
