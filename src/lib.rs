//! Benchmarks a shell sort on growing inputs, fits
//! `T(n) = a * n^1.5 + b * n + c` by least squares and checks the
//! extrapolated running time against a real measurement.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod generator;
pub mod math;
pub mod report;

pub use config::Config;
pub use engine::{EstimationResult, run_estimation};
pub use error::EstimateError;
