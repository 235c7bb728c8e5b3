//! Gaussian elimination over an augmented matrix.
//!
//! The system `A x = b` is stored as `rows x (rows + 1)` values with `b` in
//! the last column. [`AugmentedMatrix::solve`] reduces it in place to
//! row-canonical form, leaving `x` in the last column.
//!
//! Elimination uses cross-multiplication (`dest * pivot - src * factor`), so
//! no division happens until back-substitution. Differences that are within
//! `epsilon` of the magnitude of the two products are treated as rounding
//! residue and flushed to exactly zero before any pivot test; passing
//! `epsilon = 0.0` gives plain exact-equality pivoting.

use crate::error::{EstimateError, Result};

pub const DEFAULT_PIVOT_EPSILON: f64 = 1e-12;

#[derive(Clone, Debug, PartialEq)]
pub struct AugmentedMatrix {
    rows: Vec<Vec<f64>>,
}

impl AugmentedMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(EstimateError::InvalidMatrix(
                "the matrix must have at least one row".to_string(),
            ));
        }

        let width = rows.len() + 1;
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(EstimateError::InvalidMatrix(format!(
                "row {i} has {} columns, a {}-row system needs {width}",
                row.len(),
                rows.len()
            )));
        }

        Ok(Self { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    /// Last column, in row order. Only meaningful after a successful solve.
    pub fn solution(&self) -> Vec<f64> {
        let last = self.rows.len();
        self.rows.iter().map(|row| row[last]).collect()
    }

    /// Reduces the system to row-canonical form.
    ///
    /// Returns `false` when the system has no unique solution; the matrix
    /// contents are unspecified in that case.
    pub fn solve(&mut self, epsilon: f64) -> bool {
        let n = self.rows.len();

        for col in 0..n {
            if self.rows[col][col] == 0.0 {
                let Some(swap_row) = (col + 1..n).find(|&r| self.rows[r][col] != 0.0) else {
                    return false;
                };
                self.rows.swap(col, swap_row);
            }

            let pivot = self.rows[col][col];
            for dest_row in col + 1..n {
                let (upper, lower) = self.rows.split_at_mut(dest_row);
                let source = &upper[col];
                let dest = &mut lower[0];
                let factor = dest[col];
                for (d, &s) in dest.iter_mut().zip(source.iter()) {
                    *d = flush_residue(*d * pivot, s * factor, epsilon);
                }
            }
        }

        let rhs = n;
        for row in (0..n).rev() {
            let diagonal = self.rows[row][row];
            if diagonal == 0.0 {
                return false;
            }

            for value in self.rows[row].iter_mut() {
                *value /= diagonal;
            }

            let x = self.rows[row][rhs];
            for dest_row in 0..row {
                let coefficient = self.rows[dest_row][row];
                self.rows[dest_row][rhs] -= coefficient * x;
                self.rows[dest_row][row] = 0.0;
            }
        }

        true
    }
}

fn flush_residue(lhs: f64, rhs: f64, epsilon: f64) -> f64 {
    let diff = lhs - rhs;
    if diff.abs() <= epsilon * (lhs.abs() + rhs.abs()) {
        0.0
    } else {
        diff
    }
}
