use std::sync::mpsc;
use std::thread;

use tracing::error;

use crate::config::Config;
use crate::engine::estimator::EstimatorState;
use crate::engine::measurement::Measurement;
use crate::engine::result::EstimationResult;
use crate::error::EstimateError;

pub enum EstimationEvent {
    StateChanged(EstimatorState),
    BucketMeasured(Measurement),
    Finished(Result<EstimationResult, EstimateError>),
}

/// Runs one estimation on a background thread and streams its progress.
pub struct EstimationWorker {
    rx: mpsc::Receiver<EstimationEvent>,
    handle: Option<thread::JoinHandle<()>>,
}

impl EstimationWorker {
    pub fn spawn(config: Config) -> Self {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let outcome = crate::engine::run_estimation_with_events(&config, tx.clone());
            if tx.send(EstimationEvent::Finished(outcome)).is_err() {
                error!("estimation finished but nobody is listening");
            }
        });

        Self {
            rx,
            handle: Some(handle),
        }
    }

    /// Blocks until the next event. Returns `None` once the worker is gone.
    pub fn next(&self) -> Option<EstimationEvent> {
        self.rx.recv().ok()
    }

    /// Drains events until the final outcome arrives.
    pub fn wait(mut self) -> anyhow::Result<EstimationResult> {
        let mut outcome = None;
        while let Some(event) = self.next() {
            if let EstimationEvent::Finished(result) = event {
                outcome = Some(result);
                break;
            }
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                anyhow::bail!("estimation worker panicked");
            }
        }
        match outcome {
            Some(result) => Ok(result?),
            None => anyhow::bail!("estimation worker exited without a result"),
        }
    }
}
