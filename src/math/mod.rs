pub mod fit;
pub mod sampling;
pub mod solver;

pub use fit::{Coefficients, CurveFitter};
pub use solver::AugmentedMatrix;
