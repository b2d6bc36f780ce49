//! Linear model adapter: Implementation of `Predictor` from an exported
//! multinomial logistic regression.
//!
//! The training pipeline exports `premium_model.json`:
//!
//! ```json
//! {
//!   "version": 1,
//!   "classes": ["Low", "Medium", "High"],
//!   "numeric_features": { "bmi": { "mean": 25.0, "std": 4.0 } },
//!   "intercepts": { "Low": 0.1 },
//!   "coefficients": { "Low": { "bmi": -0.8, "city_tier=tier_1": 0.3 } }
//! }
//! ```
//!
//! Numeric features are standardized with the exported mean/std. Categorical
//! features are one-hot keys of the form `name=value`. Keys missing from a
//! class's coefficient map contribute zero.
//!
//! # Integrity
//!
//! An optional SHA-256 pin can be supplied; the model file is hashed before
//! parsing and loading fails on mismatch.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{Prediction, PredictorError, PredictorInput};
use crate::ports::Predictor;

/// File name looked up inside the model directory.
pub const MODEL_FILE_NAME: &str = "premium_model.json";

const SUPPORTED_VERSION: u32 = 1;

/// Standardization parameters for one numeric feature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Standardizer {
    pub mean: f64,
    pub std: f64,
}

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedLinearModel {
    pub version: u32,
    pub classes: Vec<String>,
    #[serde(default)]
    pub numeric_features: BTreeMap<String, Standardizer>,
    #[serde(default)]
    pub intercepts: BTreeMap<String, f64>,
    #[serde(default)]
    pub coefficients: BTreeMap<String, BTreeMap<String, f64>>,
}

impl ExportedLinearModel {
    fn check(&self) -> Result<(), PredictorError> {
        if self.version != SUPPORTED_VERSION {
            return Err(PredictorError::InvalidModel(format!(
                "unsupported model version {} (expected {SUPPORTED_VERSION})",
                self.version
            )));
        }
        if self.classes.is_empty() {
            return Err(PredictorError::InvalidModel("no classes declared".into()));
        }

        let mut declared = HashSet::new();
        for class in &self.classes {
            if class.trim().is_empty() {
                return Err(PredictorError::InvalidModel("empty class name".into()));
            }
            if !declared.insert(class.as_str()) {
                return Err(PredictorError::InvalidModel(format!(
                    "duplicate class {class:?}"
                )));
            }
        }

        for class in self.intercepts.keys().chain(self.coefficients.keys()) {
            if !declared.contains(class.as_str()) {
                return Err(PredictorError::InvalidModel(format!(
                    "parameters given for undeclared class {class:?}"
                )));
            }
        }

        for (name, s) in &self.numeric_features {
            if !s.mean.is_finite() || !s.std.is_finite() || s.std <= 0.0 {
                return Err(PredictorError::InvalidModel(format!(
                    "invalid standardizer for {name}: mean={}, std={}",
                    s.mean, s.std
                )));
            }
        }

        let all_finite = self.intercepts.values().all(|v| v.is_finite())
            && self
                .coefficients
                .values()
                .flat_map(BTreeMap::values)
                .all(|v| v.is_finite());
        if !all_finite {
            return Err(PredictorError::InvalidModel(
                "non-finite intercept or coefficient".into(),
            ));
        }

        Ok(())
    }

    fn numeric(&self, name: &str, raw: f64) -> f64 {
        match self.numeric_features.get(name) {
            Some(s) => (raw - s.mean) / s.std,
            None => raw,
        }
    }

    /// Encode a request into named feature values.
    fn encode(&self, input: &PredictorInput) -> BTreeMap<String, f64> {
        let mut features = BTreeMap::new();
        features.insert("bmi".to_string(), self.numeric("bmi", input.bmi));
        features.insert(
            "income_lpa".to_string(),
            self.numeric("income_lpa", input.income_lpa),
        );

        let categorical = [
            ("age_group", input.age_group.as_str()),
            ("lifestyle_risk", input.lifestyle_risk.as_str()),
            ("city_tier", input.city_tier.as_str()),
            ("occupation", input.occupation.as_str()),
        ];
        for (name, value) in categorical {
            features.insert(format!("{name}={value}"), 1.0);
        }
        features
    }

    fn scores(&self, features: &BTreeMap<String, f64>) -> Vec<f64> {
        self.classes
            .iter()
            .map(|class| {
                let intercept = self.intercepts.get(class).copied().unwrap_or(0.0);
                let dot: f64 = self
                    .coefficients
                    .get(class)
                    .map(|weights| {
                        weights
                            .iter()
                            .filter_map(|(k, w)| features.get(k).map(|x| w * x))
                            .sum()
                    })
                    .unwrap_or(0.0);
                intercept + dot
            })
            .collect()
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Predictor backed by an exported linear model.
#[derive(Debug, Default)]
pub struct LinearModelPredictor {
    model: Option<ExportedLinearModel>,
}

impl LinearModelPredictor {
    #[must_use]
    pub fn new() -> Self {
        Self { model: None }
    }

    /// Build directly from parameters (used by tests and tooling).
    ///
    /// # Errors
    /// Returns `PredictorError::InvalidModel` if the parameters are inconsistent.
    pub fn from_model(model: ExportedLinearModel) -> Result<Self, PredictorError> {
        model.check()?;
        Ok(Self { model: Some(model) })
    }

    /// Load `premium_model.json` from `model_dir` (or `model_dir` itself if it
    /// is a file), optionally checking a SHA-256 pin first.
    ///
    /// # Errors
    /// Returns error if the file is missing, fails the pin, or is invalid.
    pub fn load_model(
        &mut self,
        model_dir: &Path,
        expected_sha256: Option<&str>,
    ) -> Result<(), PredictorError> {
        let path: PathBuf = if model_dir.is_dir() {
            model_dir.join(MODEL_FILE_NAME)
        } else {
            model_dir.to_path_buf()
        };

        let bytes = std::fs::read(&path).map_err(|e| {
            PredictorError::ModelNotLoaded(format!("cannot read {}: {e}", path.display()))
        })?;

        let actual = sha256_hex(&bytes);
        match expected_sha256 {
            Some(expected) if !expected.eq_ignore_ascii_case(&actual) => {
                return Err(PredictorError::IntegrityMismatch {
                    expected: expected.to_ascii_lowercase(),
                    actual,
                });
            }
            Some(_) => tracing::debug!("Model digest matches configured pin"),
            None => tracing::debug!("No model digest pin configured"),
        }

        let model: ExportedLinearModel = serde_json::from_slice(&bytes).map_err(|e| {
            PredictorError::InvalidModel(format!("{}: {e}", path.display()))
        })?;
        model.check()?;

        tracing::info!(
            "Loaded premium model from {} ({} classes, sha256 {})",
            path.display(),
            model.classes.len(),
            &actual[..12]
        );
        self.model = Some(model);
        Ok(())
    }

    #[cfg(test)]
    fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Classes the loaded model can return.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        self.model.as_ref().map_or(&[], |m| m.classes.as_slice())
    }
}

impl Predictor for LinearModelPredictor {
    fn predict(&self, input: &PredictorInput) -> Result<Prediction, PredictorError> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| PredictorError::ModelNotLoaded("call load_model first".into()))?;

        let features = model.encode(input);
        let probabilities = softmax(&model.scores(&features));

        let (best, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |acc, (i, p)| if p > acc.1 { (i, p) } else { acc });

        if !confidence.is_finite() {
            return Err(PredictorError::MalformedOutput(
                "model produced non-finite scores".into(),
            ));
        }

        let class_probabilities = model
            .classes
            .iter()
            .cloned()
            .zip(probabilities.iter().map(|p| (p * 10_000.0).round() / 10_000.0))
            .collect();

        tracing::debug!(
            "Model scored {} classes, best={} ({:.2}%)",
            model.classes.len(),
            model.classes[best],
            confidence * 100.0
        );

        Ok(Prediction {
            predicted_category: model.classes[best].clone(),
            confidence: Some((confidence * 10_000.0).round() / 10_000.0),
            class_probabilities,
        })
    }
}
