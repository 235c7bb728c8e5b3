use serde::{Deserialize, Serialize};

use crate::math::fit::Coefficients;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// `count` evenly spaced values from `min` to `max`, both ends included.
pub fn evenly_spaced(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { max } else { min + step * i as f64 })
                .collect()
        }
    }
}

/// Evaluates the fitted model over `[0, x_max]` for line display.
pub fn sample_curve(coefficients: &Coefficients, x_max: f64, count: usize) -> Vec<CurvePoint> {
    evenly_spaced(0.0, x_max, count)
        .into_iter()
        .map(|x| CurvePoint {
            x,
            y: coefficients.evaluate(x),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evenly_spaced_includes_both_ends() {
        let xs = evenly_spaced(0.0, 10.0, 5);
        assert_eq!(xs, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_evenly_spaced_degenerate_counts() {
        assert!(evenly_spaced(0.0, 1.0, 0).is_empty());
        assert_eq!(evenly_spaced(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn test_sample_curve_is_dense_and_non_negative() {
        let c = Coefficients::new(1.0e-5, -0.2, 1.0);
        let curve = sample_curve(&c, 13_200.0, 1000);
        assert_eq!(curve.len(), 1000);
        assert_eq!(curve[0].x, 0.0);
        assert_eq!(curve[999].x, 13_200.0);
        assert!(curve.windows(2).all(|w| w[0].x < w[1].x));
        assert!(curve.iter().all(|p| p.y >= 0.0));
    }
}
