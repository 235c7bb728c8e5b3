//! Least-squares fit of `T(n) = a * n^1.5 + b * n + c`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::measurement::Measurement;
use crate::error::{EstimateError, Result};
use crate::math::solver::{AugmentedMatrix, DEFAULT_PIVOT_EPSILON};

/// Exponents of the model basis `(n^1.5, n, 1)`.
pub const BASIS_EXPONENTS: [f64; 3] = [1.5, 1.0, 0.0];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Coefficients {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Predicted time at `n`. A timing cannot be negative, so the model
    /// output is clamped at zero.
    pub fn evaluate(&self, n: f64) -> f64 {
        let t = self.a * n.powf(1.5) + self.b * n + self.c;
        t.max(0.0)
    }

    pub fn predict_many(&self, sizes: &[usize]) -> Vec<f64> {
        sizes.iter().map(|&n| self.evaluate(n as f64)).collect()
    }

    fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }
}

/// Builds the 3x4 normal equations for the model basis.
pub fn normal_equations(measurements: &[Measurement]) -> Result<AugmentedMatrix> {
    if measurements.is_empty() {
        return Err(EstimateError::NoMeasurements);
    }

    let mut rows = vec![vec![0.0; BASIS_EXPONENTS.len() + 1]; BASIS_EXPONENTS.len()];
    for m in measurements {
        let Some(average) = m.average_time() else {
            return Err(EstimateError::EmptySamples {
                index: m.index(),
                elements_count: m.elements_count(),
            });
        };
        let n = m.elements_count() as f64;

        for (i, &p_i) in BASIS_EXPONENTS.iter().enumerate() {
            for (j, &p_j) in BASIS_EXPONENTS.iter().enumerate() {
                rows[i][j] += n.powf(p_i + p_j);
            }
            rows[i][BASIS_EXPONENTS.len()] += n.powf(p_i) * average;
        }
    }

    AugmentedMatrix::new(rows)
}

#[derive(Clone, Copy, Debug)]
pub struct CurveFitter {
    epsilon: f64,
}

impl Default for CurveFitter {
    fn default() -> Self {
        Self::new(DEFAULT_PIVOT_EPSILON)
    }
}

impl CurveFitter {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Ordinary least squares over every measurement's average time.
    ///
    /// `Ok(None)` means the system has no unique solution, which includes
    /// fewer than three distinct sizes.
    pub fn fit(&self, measurements: &[Measurement]) -> Result<Option<Coefficients>> {
        let mut matrix = normal_equations(measurements)?;

        let distinct: BTreeSet<usize> = measurements.iter().map(|m| m.elements_count()).collect();
        if distinct.len() < BASIS_EXPONENTS.len() {
            warn!(
                distinct_sizes = distinct.len(),
                "fit is under-determined, need at least {} distinct sizes",
                BASIS_EXPONENTS.len()
            );
            return Ok(None);
        }

        if !matrix.solve(self.epsilon) {
            warn!("normal equations are singular");
            return Ok(None);
        }

        let x = matrix.solution();
        let coefficients = Coefficients::new(x[0], x[1], x[2]);
        if !coefficients.is_finite() {
            warn!(?coefficients, "solver produced non-finite coefficients");
            return Ok(None);
        }

        debug!(?coefficients, "fitted model");
        Ok(Some(coefficients))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(index: usize, n: usize, t: f64) -> Measurement {
        Measurement::with_samples(index, n, vec![t])
    }

    fn model(a: f64, b: f64, c: f64, n: usize) -> f64 {
        let n = n as f64;
        a * n.powf(1.5) + b * n + c
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        let scale = expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance * scale,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_evaluate_matches_model() {
        let c = Coefficients::new(2.0, 3.0, 4.0);
        assert_close(c.evaluate(4.0), 2.0 * 8.0 + 12.0 + 4.0, 1e-12);
    }

    #[test]
    fn test_evaluate_clamps_negative_output() {
        let c = Coefficients::new(-1.0, 0.5, -3.0);
        assert_eq!(c.evaluate(0.0), 0.0);
        assert_eq!(c.evaluate(1.0e6), 0.0);
        assert_eq!(c.evaluate(1.0e9), 0.0);
        assert!(c.predict_many(&[0, 1, 10, 1000, 1_000_000]).iter().all(|&t| t >= 0.0));
    }

    #[test]
    fn test_normal_equations_layout() {
        let ms = vec![exact(1, 4, 1.0), exact(2, 9, 2.0)];
        let m = normal_equations(&ms).unwrap();
        // (0, 0) = sum n^3
        assert_close(m.get(0, 0), 64.0 + 729.0, 1e-12);
        // (0, 1) = sum n^2.5
        assert_close(m.get(0, 1), 32.0 + 243.0, 1e-12);
        // (1, 2) = sum n
        assert_close(m.get(1, 2), 13.0, 1e-12);
        // (2, 2) = count
        assert_close(m.get(2, 2), 2.0, 1e-12);
        // (0, 3) = sum n^1.5 * t
        assert_close(m.get(0, 3), 8.0 * 1.0 + 27.0 * 2.0, 1e-12);
        // (2, 3) = sum t
        assert_close(m.get(2, 3), 3.0, 1e-12);
    }

    #[test]
    fn test_recovers_noiseless_model() {
        let (a, b, c) = (0.25, -1.5, 40.0);
        let ms: Vec<Measurement> = [4, 9, 16, 25, 36]
            .iter()
            .enumerate()
            .map(|(i, &n)| exact(i + 1, n, model(a, b, c, n)))
            .collect();

        let fitted = CurveFitter::default().fit(&ms).unwrap().unwrap();
        assert_close(fitted.a, a, 1e-6);
        assert_close(fitted.b, b, 1e-6);
        assert_close(fitted.c, c, 1e-6);
    }

    #[test]
    fn test_recovers_model_at_benchmark_scale() {
        let (a, b, c) = (1.0e-5, 2.0e-4, 0.5);
        let ms: Vec<Measurement> = (1..=5)
            .map(|i| {
                let n = i * 1000;
                exact(i, n, model(a, b, c, n))
            })
            .collect();

        let fitted = CurveFitter::default().fit(&ms).unwrap().unwrap();
        for n in [1000, 3000, 5000, 10_000] {
            assert_close(fitted.evaluate(n as f64), model(a, b, c, n), 1e-6);
        }
    }

    #[test]
    fn test_fit_uses_average_time() {
        let ms = vec![
            Measurement::with_samples(1, 1, vec![0.0, 2.0]),
            Measurement::with_samples(2, 4, vec![2.0, 4.0]),
            Measurement::with_samples(3, 9, vec![5.0, 7.0]),
        ];
        // Averages 1, 3, 6 are interpolated exactly by three points
        let fitted = CurveFitter::default().fit(&ms).unwrap().unwrap();
        assert_close(fitted.evaluate(1.0), 1.0, 1e-9);
        assert_close(fitted.evaluate(4.0), 3.0, 1e-9);
        assert_close(fitted.evaluate(9.0), 6.0, 1e-9);
    }

    #[test]
    fn test_fewer_than_three_sizes_is_unsolved() {
        let ms = vec![exact(1, 10, 1.0), exact(2, 20, 2.0)];
        assert_eq!(CurveFitter::default().fit(&ms).unwrap(), None);

        let repeated = vec![exact(1, 10, 1.0), exact(2, 10, 1.1), exact(3, 20, 2.0)];
        assert_eq!(CurveFitter::default().fit(&repeated).unwrap(), None);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(
            CurveFitter::default().fit(&[]).unwrap_err(),
            EstimateError::NoMeasurements
        );
    }

    #[test]
    fn test_measurement_without_samples_is_rejected() {
        let ms = vec![exact(1, 10, 1.0), Measurement::new(2, 20), exact(3, 30, 3.0)];
        assert_eq!(
            CurveFitter::default().fit(&ms).unwrap_err(),
            EstimateError::EmptySamples {
                index: 2,
                elements_count: 20
            }
        );
    }
}
