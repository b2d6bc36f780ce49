//! Adapters layer: Concrete implementations of ports.
//!
//! - `model`: exported linear model loaded from JSON
//! - `timeout`: deadline wrapper around any predictor
//! - `sanitize`: redaction of profile data in log output

pub mod model;
pub mod sanitize;
pub mod timeout;

pub use model::LinearModelPredictor;
pub use timeout::{TimeoutPredictor, DEFAULT_PREDICTOR_TIMEOUT};
