//! Deadline wrapper for predictors.
//!
//! The inner call runs on its own thread and the caller waits on a channel
//! with `recv_timeout`. A call that misses the deadline is abandoned: its
//! thread finishes on its own and the late answer is dropped with the
//! channel.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::domain::{Prediction, PredictorError, PredictorInput};
use crate::ports::Predictor;

/// Default deadline for a single prediction.
pub const DEFAULT_PREDICTOR_TIMEOUT: Duration = Duration::from_secs(5);

/// Wraps a predictor and fails calls that take longer than `timeout`.
pub struct TimeoutPredictor<P> {
    inner: Arc<P>,
    timeout: Duration,
}

impl<P> TimeoutPredictor<P>
where
    P: Predictor + 'static,
{
    pub fn new(inner: Arc<P>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<P> Predictor for TimeoutPredictor<P>
where
    P: Predictor + 'static,
{
    fn predict(&self, input: &PredictorInput) -> Result<Prediction, PredictorError> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let input = input.clone();

        thread::Builder::new()
            .name("predictor-call".into())
            .spawn(move || {
                // Receiver may be gone after a timeout.
                let _ = tx.send(inner.predict(&input));
            })
            .map_err(|e| PredictorError::Unavailable(format!("cannot spawn predictor thread: {e}")))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!("Predictor call exceeded {:?}", self.timeout);
                Err(PredictorError::Timeout(self.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(PredictorError::Unavailable(
                "predictor thread exited without a result".into(),
            )),
        }
    }
}
