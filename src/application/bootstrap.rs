//! Composition root shared by the TUI and the `quote` binary.

use std::sync::Arc;

use crate::adapters::{LinearModelPredictor, TimeoutPredictor};
use crate::config::AppConfig;
use crate::domain::CityTiers;
use crate::InsuranceError;

use super::PremiumService;

/// Service wired to the exported model behind a deadline.
pub type ModelService = PremiumService<TimeoutPredictor<LinearModelPredictor>>;

/// Load the model and city tiers named by `config` and wire the service.
///
/// Refuses to build without a loadable model.
///
/// # Errors
/// Returns error if the model is missing, fails its pin, or the city tier
/// file cannot be read.
pub fn build_service(config: &AppConfig) -> Result<ModelService, InsuranceError> {
    if !config.model_path.exists() {
        return Err(InsuranceError::Config(format!(
            "Model path not found at {}. Set {} to a directory containing premium_model.json.",
            config.model_path.display(),
            crate::config::MODEL_PATH_ENV
        )));
    }

    let mut model = LinearModelPredictor::new();
    model.load_model(&config.model_path, config.model_sha256.as_deref())?;
    let classes = model.classes().join(", ");
    let predictor = TimeoutPredictor::new(Arc::new(model), config.predictor_timeout);
    tracing::info!(
        "Predictor ready: classes [{}], deadline {:?}",
        classes,
        predictor.timeout()
    );

    let city_tiers = match &config.city_tiers_path {
        Some(path) => CityTiers::from_file(path)?,
        None => CityTiers::default(),
    };

    Ok(PremiumService::new(Arc::new(predictor), Arc::new(city_tiers)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CityTier, PredictorError, ProfileInput};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn bundled() -> AppConfig {
        AppConfig {
            model_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models"),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_build_with_bundled_model() {
        let service = build_service(&bundled()).expect("service");
        let quote = service
            .quote(&ProfileInput {
                age: 30,
                weight_kg: 90.0,
                height_m: 1.75,
                income_lpa: 12.0,
                is_smoker: false,
                city: "Mumbai".into(),
                occupation: "private_job".into(),
            })
            .expect("quote");
        assert!(["Low", "Medium", "High"].contains(&quote.prediction.predicted_category.as_str()));
    }

    #[test]
    fn test_missing_model_path() {
        let dir = TempDir::new().expect("tempdir");
        let cfg = AppConfig {
            model_path: dir.path().join("nope"),
            ..AppConfig::default()
        };
        assert!(matches!(build_service(&cfg), Err(InsuranceError::Config(_))));
    }

    #[test]
    fn test_pin_mismatch_refuses_to_start() {
        let cfg = AppConfig {
            model_sha256: Some("0".repeat(64)),
            ..bundled()
        };
        assert!(matches!(
            build_service(&cfg),
            Err(InsuranceError::Predictor(PredictorError::IntegrityMismatch { .. }))
        ));
    }

    #[test]
    fn test_city_tier_override() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tiers.json");
        std::fs::write(&path, r#"{"tier_1": ["Indore"], "tier_2": []}"#).expect("write");

        let cfg = AppConfig {
            city_tiers_path: Some(path),
            ..bundled()
        };
        let service = build_service(&cfg).expect("service");
        assert_eq!(service.city_tiers().tier_of("Indore"), CityTier::Tier1);
        assert_eq!(service.city_tiers().tier_of("Mumbai"), CityTier::Tier3);
    }
}
