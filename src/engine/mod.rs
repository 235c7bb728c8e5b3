pub mod estimator;
pub mod measurement;
pub mod result;
pub mod trial;

use std::sync::mpsc::Sender;

use crate::config::Config;
use crate::error::Result;
use crate::event::EstimationEvent;
use crate::generator::SampleGenerator;

pub use estimator::{Estimator, EstimatorState};
pub use measurement::Measurement;
pub use result::EstimationResult;
pub use trial::{SortTrial, Trial};

/// Benchmarks the configured sort, fits the model and checks the prediction.
pub fn run_estimation(config: &Config) -> Result<EstimationResult> {
    Estimator::new(config.clone(), sort_trial(config))?.run()
}

pub fn run_estimation_with_events(
    config: &Config,
    events: Sender<EstimationEvent>,
) -> Result<EstimationResult> {
    Estimator::new(config.clone(), sort_trial(config))?
        .with_events(events)
        .run()
}

fn sort_trial(config: &Config) -> SortTrial {
    // Each run owns its random source
    let generator = match config.seed {
        Some(seed) => SampleGenerator::seeded(seed),
        None => SampleGenerator::from_entropy(),
    };
    SortTrial::new(generator, config.sort)
}
