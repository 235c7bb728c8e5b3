use std::fmt;
use std::sync::mpsc::Sender;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::measurement::Measurement;
use crate::engine::result::EstimationResult;
use crate::engine::trial::Trial;
use crate::error::{EstimateError, Result};
use crate::event::EstimationEvent;
use crate::math::fit::{Coefficients, CurveFitter};
use crate::math::sampling::sample_curve;

/// The prediction target is this multiple of the largest benchmarked size.
pub const TARGET_FACTOR: usize = 2;
/// The display curve extends this far past the target size.
pub const CURVE_OVERSHOOT: f64 = 1.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimatorState {
    Idle,
    Benchmarking,
    Fitting,
    Predicting,
    Done,
    Failed,
}

impl EstimatorState {
    pub fn as_str(self) -> &'static str {
        match self {
            EstimatorState::Idle => "idle",
            EstimatorState::Benchmarking => "benchmarking",
            EstimatorState::Fitting => "fitting",
            EstimatorState::Predicting => "predicting",
            EstimatorState::Done => "done",
            EstimatorState::Failed => "failed",
        }
    }
}

impl fmt::Display for EstimatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coefficients together with the size they are meant to extrapolate to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FittedModel {
    pub coefficients: Coefficients,
    pub target_size: usize,
}

/// Runs benchmark buckets, fits the model and checks its prediction
/// against one more real bucket.
pub struct Estimator<T: Trial> {
    config: Config,
    trial: T,
    state: EstimatorState,
    measurements: Vec<Measurement>,
    events: Option<Sender<EstimationEvent>>,
}

impl<T: Trial> Estimator<T> {
    pub fn new(config: Config, trial: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            trial,
            state: EstimatorState::Idle,
            measurements: Vec::new(),
            events: None,
        })
    }

    pub fn with_events(mut self, events: Sender<EstimationEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> EstimatorState {
        self.state
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn bucket_sizes(&self) -> Vec<usize> {
        (0..self.config.bucket_count)
            .map(|i| self.config.initial_size + i * self.config.size_step)
            .collect()
    }

    pub fn run(mut self) -> Result<EstimationResult> {
        self.benchmark()?;
        let model = self.fit()?;
        self.predict(model)
    }

    /// Runs every configured bucket in order, sequentially.
    pub fn benchmark(&mut self) -> Result<()> {
        self.require(EstimatorState::Idle)?;
        self.set_state(EstimatorState::Benchmarking);
        for size in self.bucket_sizes() {
            self.run_bucket(size);
        }
        Ok(())
    }

    pub fn fit(&mut self) -> Result<FittedModel> {
        self.require(EstimatorState::Benchmarking)?;
        self.set_state(EstimatorState::Fitting);

        let Some(largest) = self.measurements.iter().map(Measurement::elements_count).max() else {
            self.set_state(EstimatorState::Failed);
            return Err(EstimateError::NoMeasurements);
        };
        let target_size = largest * TARGET_FACTOR;

        let fitter = CurveFitter::new(self.config.pivot_epsilon);
        match fitter.fit(&self.measurements) {
            Ok(Some(coefficients)) => {
                info!(
                    a = coefficients.a,
                    b = coefficients.b,
                    c = coefficients.c,
                    target_size,
                    "fitted T(n) = a*n^1.5 + b*n + c"
                );
                Ok(FittedModel {
                    coefficients,
                    target_size,
                })
            }
            Ok(None) => {
                warn!("estimation failed: fit has no unique solution");
                self.set_state(EstimatorState::Failed);
                Err(EstimateError::Unsolved)
            }
            Err(err) => {
                self.set_state(EstimatorState::Failed);
                Err(err)
            }
        }
    }

    /// Evaluates the model at the target size, then measures the target
    /// size for real and appends it as the extrapolation point.
    pub fn predict(&mut self, model: FittedModel) -> Result<EstimationResult> {
        self.require(EstimatorState::Fitting)?;
        self.set_state(EstimatorState::Predicting);

        let FittedModel {
            coefficients,
            target_size,
        } = model;
        let predicted_value = coefficients.evaluate(target_size as f64);

        let extra = self.run_bucket(target_size);
        let actual_value = extra.average_time().ok_or(EstimateError::EmptySamples {
            index: extra.index(),
            elements_count: extra.elements_count(),
        })?;

        let curve = sample_curve(
            &coefficients,
            target_size as f64 * CURVE_OVERSHOOT,
            self.config.curve_points,
        );

        info!(
            target_size,
            predicted_value, actual_value, "prediction checked against real bucket"
        );
        self.set_state(EstimatorState::Done);

        Ok(EstimationResult {
            sort: self.config.sort,
            measurements: self.measurements.clone(),
            coefficients,
            target_size,
            predicted_value,
            actual_value,
            curve,
            completed_at: Utc::now(),
        })
    }

    /// Each step may only follow the one before it, exactly once.
    fn require(&self, expected: EstimatorState) -> Result<()> {
        if self.state != expected {
            return Err(EstimateError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    fn run_bucket(&mut self, size: usize) -> Measurement {
        let mut measurement = Measurement::new(self.measurements.len() + 1, size);
        for _ in 0..self.config.trials_per_bucket {
            measurement.push_sample(self.trial.run(size));
        }

        debug!(
            index = measurement.index(),
            size,
            average_ms = measurement.average_time(),
            "bucket measured"
        );
        self.emit(EstimationEvent::BucketMeasured(measurement.clone()));
        self.measurements.push(measurement.clone());
        measurement
    }

    fn set_state(&mut self, state: EstimatorState) {
        if self.state != state {
            debug!(from = self.state.as_str(), to = state.as_str(), "estimator state");
            self.state = state;
            self.emit(EstimationEvent::StateChanged(state));
        }
    }

    fn emit(&self, event: EstimationEvent) {
        if let Some(ref tx) = self.events {
            // A dropped receiver only means nobody is watching progress
            let _ = tx.send(event);
        }
    }
}
