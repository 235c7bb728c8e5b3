use std::fmt;

use crate::engine::result::EstimationResult;

/// Plain-text summary of an estimation run.
pub fn render(result: &EstimationResult) -> String {
    Report(result).to_string()
}

/// Display adapter so the report can be written to any `fmt::Write` sink.
pub struct Report<'a>(pub &'a EstimationResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "Sort algorithm: {}", result.sort)?;
        writeln!(f)?;
        writeln!(f, "{:>4}  {:>10}  {:>14}  {:>8}", "#", "n", "avg time (ms)", "trials")?;
        for m in &result.measurements {
            let average = m
                .average_time()
                .map(|t| format!("{t:.3}"))
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "{:>4}  {:>10}  {:>14}  {:>8}",
                m.index(),
                m.elements_count(),
                average,
                m.samples().len()
            )?;
        }

        let c = &result.coefficients;
        writeln!(f)?;
        writeln!(
            f,
            "T(n) = {:.6e} * n^1.5 + {:.6e} * n + {:.6e}",
            c.a, c.b, c.c
        )?;
        writeln!(f, "Target size:    {}", result.target_size)?;
        writeln!(f, "Predicted time: {:.3} ms", result.predicted_value)?;
        writeln!(f, "Actual time:    {:.3} ms", result.actual_value)?;
        match result.relative_error() {
            Some(err) => writeln!(f, "Relative error: {:+.1}%", err * 100.0),
            None => writeln!(f, "Relative error: n/a"),
        }
    }
}
