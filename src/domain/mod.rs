//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O beyond loading static tier lists.
//! Validation happens at construction, derivation is a pure function of
//! validated values.

mod city_tier;
mod features;
mod prediction;
mod profile;

pub use city_tier::CityTiers;
pub use features::{bmi, AgeGroup, BmiCategory, CityTier, DerivedFeatures, LifestyleRisk};
pub use prediction::{Prediction, PredictorError, PredictorInput, Quote};
pub use profile::{Occupation, ProfileInput, UserProfile, ValidationError, ValidationErrors};
