//! Derived features computed from a validated profile.
//!
//! All functions here are pure. `DerivedFeatures` is computed once per
//! request and exposes no way to change a value after the fact.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{CityTiers, UserProfile};

/// Body Mass Index: weight in kilograms over height in meters squared.
#[must_use]
pub fn bmi(weight_kg: f64, height_m: f64) -> f64 {
    weight_kg / (height_m * height_m)
}

/// Lifestyle risk bucket from smoking status and BMI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifestyleRisk {
    Low,
    Medium,
    High,
}

impl LifestyleRisk {
    /// High for a smoker with BMI above 30. Medium for any other smoker or a
    /// BMI above 27. Low otherwise.
    #[must_use]
    pub fn classify(is_smoker: bool, bmi: f64) -> Self {
        if is_smoker && bmi > 30.0 {
            Self::High
        } else if is_smoker || bmi > 27.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for LifestyleRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age bracket. Displays capitalized, serializes lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Minor,
    Adult,
    Senior,
}

impl AgeGroup {
    #[must_use]
    pub fn classify(age: u32) -> Self {
        if age < 18 {
            Self::Minor
        } else if age < 60 {
            Self::Adult
        } else {
            Self::Senior
        }
    }

    /// Wire name (`"minor"`, `"adult"`, `"senior"`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Adult => "adult",
            Self::Senior => "senior",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minor => write!(f, "Minor"),
            Self::Adult => write!(f, "Adult"),
            Self::Senior => write!(f, "Senior"),
        }
    }
}

/// City tier. Displays as "Tier N", serializes as "tier_n".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CityTier {
    #[serde(rename = "tier_1")]
    Tier1,
    #[serde(rename = "tier_2")]
    Tier2,
    #[serde(rename = "tier_3")]
    Tier3,
}

impl CityTier {
    /// Wire name (`"tier_1"`, `"tier_2"`, `"tier_3"`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tier1 => "tier_1",
            Self::Tier2 => "tier_2",
            Self::Tier3 => "tier_3",
        }
    }
}

impl fmt::Display for CityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tier1 => write!(f, "Tier 1"),
            Self::Tier2 => write!(f, "Tier 2"),
            Self::Tier3 => write!(f, "Tier 3"),
        }
    }
}

/// Qualitative BMI label shown next to the BMI metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    #[must_use]
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        };
        f.write_str(label)
    }
}

/// The four derived attributes of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedFeatures {
    bmi: f64,
    age_group: AgeGroup,
    lifestyle_risk: LifestyleRisk,
    city_tier: CityTier,
}

impl DerivedFeatures {
    /// Compute all derived attributes of `profile`.
    ///
    /// Height is strictly positive on any `UserProfile`, so BMI is finite.
    #[must_use]
    pub fn derive(profile: &UserProfile, tiers: &CityTiers) -> Self {
        let bmi = bmi(profile.weight_kg(), profile.height_m());
        Self {
            bmi,
            age_group: AgeGroup::classify(profile.age()),
            lifestyle_risk: LifestyleRisk::classify(profile.is_smoker(), bmi),
            city_tier: tiers.tier_of(profile.city()),
        }
    }

    #[must_use]
    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    #[must_use]
    pub fn age_group(&self) -> AgeGroup {
        self.age_group
    }

    #[must_use]
    pub fn lifestyle_risk(&self) -> LifestyleRisk {
        self.lifestyle_risk
    }

    #[must_use]
    pub fn city_tier(&self) -> CityTier {
        self.city_tier
    }

    #[must_use]
    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::classify(self.bmi)
    }
}
