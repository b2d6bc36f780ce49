//! Ports layer: Trait definitions for external operations.
//!
//! These traits mark the boundary between the application and the
//! collaborators it does not own.

mod predictor;

pub use predictor::Predictor;
