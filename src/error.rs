use thiserror::Error;

use crate::engine::estimator::EstimatorState;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// The augmented matrix does not have `rows x (rows + 1)` shape.
    #[error("invalid augmented matrix: {0}")]
    InvalidMatrix(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no measurements to fit")]
    NoMeasurements,

    #[error("measurement #{index} (n = {elements_count}) has no samples")]
    EmptySamples { index: usize, elements_count: usize },

    /// An estimator step was called out of order.
    #[error("estimator step needs state {expected}, but the estimator is {actual}")]
    InvalidState {
        expected: EstimatorState,
        actual: EstimatorState,
    },

    /// The least-squares system has no unique solution.
    #[error("the fitted model has no unique solution")]
    Unsolved,
}

pub type Result<T> = std::result::Result<T, EstimateError>;
