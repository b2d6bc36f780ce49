//! # Premium Predictor
//!
//! Insurance premium category prediction from a small user profile.
//!
//! A user enters age, weight, height, income, smoking status, city and
//! occupation. The profile is validated, four features are derived from it
//! (BMI, age group, lifestyle risk, city tier) and the resulting record is
//! handed to a predictor that returns a premium category label.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Profile validation, feature derivation, prediction records
//! - `ports`: The `Predictor` trait
//! - `adapters`: Exported linear model, timeout wrapper, log redaction
//! - `application`: `PremiumService`, the per-request orchestrator
//! - `config`: Environment-driven settings
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Prediction, ProfileInput, Quote, UserProfile};

/// Result type for premium prediction operations
pub type Result<T> = std::result::Result<T, InsuranceError>;

/// Main error type
#[derive(Debug, thiserror::Error)]
pub enum InsuranceError {
    #[error("Invalid profile: {0}")]
    Validation(#[from] domain::ValidationErrors),

    #[error("Prediction failed: {0}")]
    Predictor(#[from] domain::PredictorError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
