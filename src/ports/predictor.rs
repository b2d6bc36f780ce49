//! Predictor port: Trait for the premium category model.
//!
//! The model is an external collaborator. The application only knows the
//! record it sends and the label it gets back.

use std::sync::Arc;

use crate::domain::{Prediction, PredictorError, PredictorInput};

/// Trait for premium category prediction.
pub trait Predictor: Send + Sync {
    /// Classify a prepared request into a premium category.
    ///
    /// # Errors
    /// Returns `PredictorError` if the model is unavailable, times out, or
    /// cannot produce an answer.
    fn predict(&self, input: &PredictorInput) -> Result<Prediction, PredictorError>;
}

impl<P: Predictor + ?Sized> Predictor for Arc<P> {
    fn predict(&self, input: &PredictorInput) -> Result<Prediction, PredictorError> {
        (**self).predict(input)
    }
}
