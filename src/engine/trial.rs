use std::hint::black_box;
use std::time::Instant;

use rand::Rng;
use rand::rngs::SmallRng;

use crate::generator::{SampleGenerator, SortAlgorithm};

/// One timed execution at a given input size.
pub trait Trial {
    /// Returns the elapsed time in milliseconds.
    fn run(&mut self, size: usize) -> f64;
}

impl<F> Trial for F
where
    F: FnMut(usize) -> f64,
{
    fn run(&mut self, size: usize) -> f64 {
        self(size)
    }
}

/// Sorts a freshly generated random input and times only the sort.
pub struct SortTrial<R: Rng = SmallRng> {
    generator: SampleGenerator<R>,
    algorithm: SortAlgorithm,
}

impl<R: Rng> SortTrial<R> {
    pub fn new(generator: SampleGenerator<R>, algorithm: SortAlgorithm) -> Self {
        Self {
            generator,
            algorithm,
        }
    }

    pub fn algorithm(&self) -> SortAlgorithm {
        self.algorithm
    }
}

impl<R: Rng> Trial for SortTrial<R> {
    fn run(&mut self, size: usize) -> f64 {
        let mut input = self.generator.generate_inputs(size);

        let start = Instant::now();
        self.generator.sort(self.algorithm, black_box(&mut input));
        let elapsed = start.elapsed();

        black_box(&input);
        elapsed.as_secs_f64() * 1000.0
    }
}
