use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::measurement::Measurement;
use crate::generator::SortAlgorithm;
use crate::math::fit::Coefficients;
use crate::math::sampling::CurvePoint;

/// Everything a front end needs to display one estimation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EstimationResult {
    pub sort: SortAlgorithm,
    /// Benchmark buckets in order, followed by the extrapolation point.
    pub measurements: Vec<Measurement>,
    pub coefficients: Coefficients,
    pub target_size: usize,
    pub predicted_value: f64,
    pub actual_value: f64,
    pub curve: Vec<CurvePoint>,
    pub completed_at: DateTime<Utc>,
}

impl EstimationResult {
    /// Measurements the model was fitted on.
    pub fn fitted_measurements(&self) -> &[Measurement] {
        match self.measurements.split_last() {
            Some((_, fitted)) => fitted,
            None => &[],
        }
    }

    /// The extra bucket measured at the target size.
    pub fn extrapolation_point(&self) -> Option<&Measurement> {
        self.measurements.last()
    }

    /// `(predicted - actual) / actual`, or `None` when nothing was measured.
    pub fn relative_error(&self) -> Option<f64> {
        if self.actual_value == 0.0 {
            return None;
        }
        Some((self.predicted_value - self.actual_value) / self.actual_value)
    }
}
