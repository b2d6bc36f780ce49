//! Static city tier membership lists.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::domain::CityTier;
use crate::InsuranceError;

const DEFAULT_TIER_1: [&str; 7] = [
    "Mumbai", "Delhi", "Bangalore", "Chennai", "Kolkata", "Hyderabad", "Pune",
];

const DEFAULT_TIER_2: [&str; 48] = [
    "Jaipur",
    "Chandigarh",
    "Indore",
    "Lucknow",
    "Patna",
    "Ranchi",
    "Visakhapatnam",
    "Coimbatore",
    "Bhopal",
    "Nagpur",
    "Vadodara",
    "Surat",
    "Rajkot",
    "Jodhpur",
    "Raipur",
    "Amritsar",
    "Varanasi",
    "Agra",
    "Dehradun",
    "Mysore",
    "Jabalpur",
    "Guwahati",
    "Thiruvananthapuram",
    "Ludhiana",
    "Nashik",
    "Allahabad",
    "Udaipur",
    "Aurangabad",
    "Hubli",
    "Belgaum",
    "Salem",
    "Vijayawada",
    "Tiruchirappalli",
    "Bhavnagar",
    "Gwalior",
    "Dhanbad",
    "Bareilly",
    "Aligarh",
    "Gaya",
    "Kozhikode",
    "Warangal",
    "Kolhapur",
    "Bilaspur",
    "Jalandhar",
    "Noida",
    "Guntur",
    "Asansol",
    "Siliguri",
];

#[derive(Debug, Deserialize)]
struct CityTierFile {
    tier_1: Vec<String>,
    tier_2: Vec<String>,
}

/// Tier 1 and Tier 2 city sets. Any city in neither set is Tier 3.
///
/// Lookups are exact and case-sensitive. Tier 1 is checked first, so a city
/// listed in both sets is Tier 1.
#[derive(Debug, Clone)]
pub struct CityTiers {
    tier_1: Vec<String>,
    tier_2: Vec<String>,
    tier_1_set: HashSet<String>,
    tier_2_set: HashSet<String>,
}

impl CityTiers {
    /// Build from explicit lists. Order is kept for display.
    #[must_use]
    pub fn new(tier_1: Vec<String>, tier_2: Vec<String>) -> Self {
        let tier_1_set: HashSet<String> = tier_1.iter().cloned().collect();
        let tier_2_set: HashSet<String> = tier_2.iter().cloned().collect();

        let overlap: Vec<&String> = tier_1_set.intersection(&tier_2_set).collect();
        if !overlap.is_empty() {
            tracing::warn!(
                "{} cities listed in both Tier 1 and Tier 2; Tier 1 takes precedence",
                overlap.len()
            );
        }

        Self {
            tier_1,
            tier_2,
            tier_1_set,
            tier_2_set,
        }
    }

    /// Load tier lists from a JSON file of the form
    /// `{"tier_1": [...], "tier_2": [...]}`.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, InsuranceError> {
        let content = std::fs::read(path)?;
        let file: CityTierFile = serde_json::from_slice(&content).map_err(|e| {
            InsuranceError::Config(format!("Invalid city tier file {}: {e}", path.display()))
        })?;

        tracing::info!(
            "Loaded city tiers from {}: {} tier 1, {} tier 2",
            path.display(),
            file.tier_1.len(),
            file.tier_2.len()
        );
        Ok(Self::new(file.tier_1, file.tier_2))
    }

    /// Classify a city.
    #[must_use]
    pub fn tier_of(&self, city: &str) -> CityTier {
        if self.tier_1_set.contains(city) {
            CityTier::Tier1
        } else if self.tier_2_set.contains(city) {
            CityTier::Tier2
        } else {
            CityTier::Tier3
        }
    }

    /// Every listed city, Tier 1 first, without duplicates.
    #[must_use]
    pub fn known_cities(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tier_1
            .iter()
            .chain(self.tier_2.iter())
            .filter(|c| seen.insert(c.as_str()))
            .map(String::as_str)
            .collect()
    }
}

impl Default for CityTiers {
    fn default() -> Self {
        Self::new(
            DEFAULT_TIER_1.iter().map(|c| c.to_string()).collect(),
            DEFAULT_TIER_2.iter().map(|c| c.to_string()).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_membership() {
        let tiers = CityTiers::default();
        assert_eq!(tiers.tier_of("Mumbai"), CityTier::Tier1);
        assert_eq!(tiers.tier_of("Pune"), CityTier::Tier1);
        assert_eq!(tiers.tier_of("Jaipur"), CityTier::Tier2);
        assert_eq!(tiers.tier_of("Siliguri"), CityTier::Tier2);
        assert_eq!(tiers.tier_of("Other"), CityTier::Tier3);
        assert_eq!(tiers.tier_of(""), CityTier::Tier3);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let tiers = CityTiers::default();
        assert_eq!(tiers.tier_of("mumbai"), CityTier::Tier3);
        assert_eq!(tiers.tier_of("MUMBAI"), CityTier::Tier3);
    }

    #[test]
    fn test_tier_1_wins_on_overlap() {
        let tiers = CityTiers::new(vec!["Goa".into()], vec!["Goa".into(), "Shimla".into()]);
        assert_eq!(tiers.tier_of("Goa"), CityTier::Tier1);
        assert_eq!(tiers.tier_of("Shimla"), CityTier::Tier2);
        assert_eq!(tiers.known_cities(), ["Goa", "Shimla"]);
    }

    #[test]
    fn test_known_cities_order() {
        let tiers = CityTiers::default();
        let cities = tiers.known_cities();
        assert_eq!(cities.len(), 55);
        assert_eq!(cities[0], "Mumbai");
        assert_eq!(cities[7], "Jaipur");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"tier_1": ["Metropolis"], "tier_2": ["Smallville"]}}"#)
            .expect("write");

        let tiers = CityTiers::from_file(file.path()).expect("should load");
        assert_eq!(tiers.tier_of("Metropolis"), CityTier::Tier1);
        assert_eq!(tiers.tier_of("Smallville"), CityTier::Tier2);
        assert_eq!(tiers.tier_of("Mumbai"), CityTier::Tier3);
    }

    #[test]
    fn test_from_file_rejects_malformed() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"tier_1": "Mumbai"}}"#).expect("write");

        let err = CityTiers::from_file(file.path()).expect_err("should fail");
        assert!(matches!(err, InsuranceError::Config(_)));
    }
}
