//! Background quote worker.
//!
//! The predictor call can block for up to the configured timeout, so it runs
//! off the UI thread and reports back over a channel.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::PremiumService;
use crate::domain::{Quote, UserProfile};
use crate::ports::Predictor;

/// Progress updates from the quote worker.
#[derive(Debug, Clone)]
pub enum QuoteProgress {
    /// Request built, waiting on the predictor
    Predicting,
    /// Prediction finished
    Complete(Box<Quote>),
    /// Prediction failed; message is user-facing
    Error(String),
}

/// Handle to a running quote worker.
pub struct QuoteWorkerHandle {
    progress_rx: Receiver<QuoteProgress>,
    _handle: JoinHandle<()>,
}

impl QuoteWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    ///
    /// A worker that exits without a final update is reported as an error
    /// so the caller never waits on a dead channel.
    #[must_use]
    pub fn try_recv(&self) -> Option<QuoteProgress> {
        match self.progress_rx.try_recv() {
            Ok(progress) => Some(progress),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("Quote worker exited without a result");
                Some(QuoteProgress::Error(
                    "worker exited without a result".to_string(),
                ))
            }
        }
    }

    /// Block until the next update arrives.
    #[must_use]
    pub fn recv(&self) -> Option<QuoteProgress> {
        self.progress_rx.recv().ok()
    }
}

/// Runs one quote on a background thread.
pub struct QuoteWorker;

impl QuoteWorker {
    /// Spawn a background quote for a validated profile.
    pub fn spawn<P>(service: Arc<PremiumService<P>>, profile: UserProfile) -> QuoteWorkerHandle
    where
        P: Predictor + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run(&service, profile, &tx);
        });

        QuoteWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run<P>(service: &PremiumService<P>, profile: UserProfile, tx: &Sender<QuoteProgress>)
    where
        P: Predictor,
    {
        let _ = tx.send(QuoteProgress::Predicting);

        match service.quote_profile(profile) {
            Ok(quote) => {
                let _ = tx.send(QuoteProgress::Complete(Box::new(quote)));
            }
            Err(e) => {
                tracing::warn!("Quote failed: {}", e);
                let _ = tx.send(QuoteProgress::Error(e.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CityTiers, Prediction, PredictorError, PredictorInput, ProfileInput};

    struct FixedPredictor(Result<Prediction, PredictorError>);

    impl Predictor for FixedPredictor {
        fn predict(&self, _input: &PredictorInput) -> Result<Prediction, PredictorError> {
            self.0.clone()
        }
    }

    fn profile() -> UserProfile {
        UserProfile::new(&ProfileInput {
            age: 42,
            weight_kg: 68.0,
            height_m: 1.7,
            income_lpa: 25.0,
            is_smoker: false,
            city: "Indore".to_string(),
            occupation: "business_owner".to_string(),
        })
        .expect("valid")
    }

    #[test]
    fn test_dead_worker_reports_error() {
        let (tx, rx) = mpsc::channel::<QuoteProgress>();
        let handle = QuoteWorkerHandle {
            progress_rx: rx,
            _handle: thread::spawn(move || drop(tx)),
        };

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        let update = loop {
            if let Some(update) = handle.try_recv() {
                break update;
            }
            assert!(std::time::Instant::now() < deadline, "no update");
            thread::sleep(std::time::Duration::from_millis(5));
        };
        match update {
            QuoteProgress::Error(message) => assert!(message.contains("exited without a result")),
            other => panic!("unexpected update: {other:?}"),
        }
    }

    fn drain(handle: &QuoteWorkerHandle) -> Vec<QuoteProgress> {
        let mut updates = Vec::new();
        while let Some(update) = handle.recv() {
            updates.push(update);
        }
        updates
    }

    #[test]
    fn test_worker_reports_completion() {
        let service = Arc::new(PremiumService::new(
            Arc::new(FixedPredictor(Ok(Prediction::category("Low")))),
            Arc::new(CityTiers::default()),
        ));
        let updates = drain(&QuoteWorker::spawn(service, profile()));

        assert_eq!(updates.len(), 2);
        assert!(matches!(updates[0], QuoteProgress::Predicting));
        match &updates[1] {
            QuoteProgress::Complete(quote) => {
                assert_eq!(quote.prediction.predicted_category, "Low");
            }
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[test]
    fn test_worker_reports_error_message() {
        let service = Arc::new(PremiumService::new(
            Arc::new(FixedPredictor(Err(PredictorError::Unavailable(
                "model offline".into(),
            )))),
            Arc::new(CityTiers::default()),
        ));
        let updates = drain(&QuoteWorker::spawn(service, profile()));

        match updates.last() {
            Some(QuoteProgress::Error(message)) => assert!(message.contains("model offline")),
            other => panic!("unexpected update: {other:?}"),
        }
    }
}
