use serde::{Deserialize, Serialize};

/// Timed samples collected for one bucket size.
///
/// The average is derived from `samples` on every read, so it can never
/// drift from the data it summarizes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "MeasurementRecord", try_from = "MeasurementRecord")]
pub struct Measurement {
    index: usize,
    elements_count: usize,
    samples: Vec<f64>,
}

impl Measurement {
    pub fn new(index: usize, elements_count: usize) -> Self {
        Self::with_samples(index, elements_count, Vec::new())
    }

    /// `elements_count` must be positive, as on the deserialization path.
    pub fn with_samples(index: usize, elements_count: usize, samples: Vec<f64>) -> Self {
        debug_assert!(
            elements_count > 0,
            "measurement #{index} needs a positive elements_count"
        );
        Self {
            index,
            elements_count,
            samples,
        }
    }

    /// 1-based position in the benchmark sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn elements_count(&self) -> usize {
        self.elements_count
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn push_sample(&mut self, elapsed_ms: f64) {
        self.samples.push(elapsed_ms);
    }

    pub fn average_time(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }
}

/// Wire form of a [`Measurement`]; `average_time` is informational only and
/// is recomputed on the way back in.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct MeasurementRecord {
    index: usize,
    elements_count: usize,
    #[serde(default)]
    average_time: Option<f64>,
    #[serde(default)]
    samples: Vec<f64>,
}

impl From<Measurement> for MeasurementRecord {
    fn from(m: Measurement) -> Self {
        Self {
            index: m.index,
            elements_count: m.elements_count,
            average_time: m.average_time(),
            samples: m.samples,
        }
    }
}

impl TryFrom<MeasurementRecord> for Measurement {
    type Error = String;

    fn try_from(record: MeasurementRecord) -> Result<Self, Self::Error> {
        if record.elements_count == 0 {
            return Err(format!(
                "measurement #{} has elements_count 0",
                record.index
            ));
        }
        Ok(Self::with_samples(
            record.index,
            record.elements_count,
            record.samples,
        ))
    }
}
