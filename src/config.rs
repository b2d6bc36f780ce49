//! Runtime configuration.
//!
//! Defaults suit a local checkout; every value can be overridden through a
//! `PREMIUM_*` environment variable. Values that are present but unparseable
//! are errors so a typo fails at startup instead of silently using a default.

use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::DEFAULT_PREDICTOR_TIMEOUT;
use crate::InsuranceError;

pub const MODEL_PATH_ENV: &str = "PREMIUM_MODEL_PATH";
pub const MODEL_SHA256_ENV: &str = "PREMIUM_MODEL_SHA256";
pub const CITY_TIERS_PATH_ENV: &str = "PREMIUM_CITY_TIERS_PATH";
pub const PREDICTOR_TIMEOUT_MS_ENV: &str = "PREMIUM_PREDICTOR_TIMEOUT_MS";
pub const LOG_MODE_ENV: &str = "PREMIUM_LOG_MODE";
pub const LOG_FILE_ENV: &str = "PREMIUM_LOG_FILE";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when attached to a terminal (the TUI owns the screen), stdout otherwise.
    Auto,
    File,
    Stdout,
}

impl std::str::FromStr for LogMode {
    type Err = InsuranceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            other => Err(InsuranceError::Config(format!(
                "{LOG_MODE_ENV} must be auto, file or stdout, got {other:?}"
            ))),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory containing `premium_model.json`, or the model file itself.
    pub model_path: PathBuf,
    /// Optional SHA-256 pin for the model file (lowercase hex).
    pub model_sha256: Option<String>,
    /// Optional JSON file overriding the built-in city tier lists.
    pub city_tiers_path: Option<PathBuf>,
    /// Deadline for one predictor call.
    pub predictor_timeout: Duration,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models"),
            model_sha256: None,
            city_tiers_path: None,
            predictor_timeout: DEFAULT_PREDICTOR_TIMEOUT,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("premium-predictor.log"),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    /// Returns `InsuranceError::Config` for any malformed value.
    pub fn from_env() -> Result<Self, InsuranceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup (the environment in production).
    ///
    /// # Errors
    /// Returns `InsuranceError::Config` for any malformed value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InsuranceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(MODEL_PATH_ENV) {
            cfg.model_path = PathBuf::from(path.trim());
        }

        if let Some(digest) = get(MODEL_SHA256_ENV) {
            let digest = digest.trim().to_ascii_lowercase();
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(InsuranceError::Config(format!(
                    "{MODEL_SHA256_ENV} must be 64 hex digits"
                )));
            }
            cfg.model_sha256 = Some(digest);
        }

        if let Some(path) = get(CITY_TIERS_PATH_ENV) {
            cfg.city_tiers_path = Some(PathBuf::from(path.trim()));
        }

        if let Some(ms) = get(PREDICTOR_TIMEOUT_MS_ENV) {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                InsuranceError::Config(format!(
                    "{PREDICTOR_TIMEOUT_MS_ENV} must be a positive integer, got {ms:?}"
                ))
            })?;
            if ms == 0 {
                return Err(InsuranceError::Config(format!(
                    "{PREDICTOR_TIMEOUT_MS_ENV} must be greater than 0"
                )));
            }
            cfg.predictor_timeout = Duration::from_millis(ms);
        }

        if let Some(mode) = get(LOG_MODE_ENV) {
            cfg.log_mode = mode.parse()?;
        }

        if let Some(file) = get(LOG_FILE_ENV) {
            cfg.log_file = PathBuf::from(file.trim());
        }

        Ok(cfg)
    }
}
