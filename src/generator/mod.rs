pub mod shell_sort;

use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    /// Gaps `len/2, len/4, ..., 1`.
    #[default]
    Shell,
    /// Gaps `2^k - 1`.
    Hibbard,
}

impl SortAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            SortAlgorithm::Shell => "shell",
            SortAlgorithm::Hibbard => "hibbard",
        }
    }

    pub fn sort(self, values: &mut [f64]) {
        match self {
            SortAlgorithm::Shell => shell_sort::shell_sort(values),
            SortAlgorithm::Hibbard => shell_sort::hibbard_sort(values),
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shell" => Ok(SortAlgorithm::Shell),
            "hibbard" => Ok(SortAlgorithm::Hibbard),
            other => Err(format!("unknown sort algorithm: {other}")),
        }
    }
}

/// Produces benchmark inputs from an owned random source.
pub struct SampleGenerator<R: Rng = SmallRng> {
    rng: R,
}

impl SampleGenerator<SmallRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }
}

impl<R: Rng> SampleGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// `size` independent values drawn uniformly from `[0, 1)`.
    pub fn generate_inputs(&mut self, size: usize) -> Vec<f64> {
        (0..size).map(|_| self.rng.gen_range(0.0..1.0)).collect()
    }

    pub fn sort(&self, algorithm: SortAlgorithm, values: &mut [f64]) {
        algorithm.sort(values);
    }
}
