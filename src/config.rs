use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::EstimateError;
use crate::generator::SortAlgorithm;
use crate::math::solver::DEFAULT_PIVOT_EPSILON;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_bucket_count")]
    pub bucket_count: usize,
    #[serde(default = "default_trials_per_bucket")]
    pub trials_per_bucket: usize,
    #[serde(default = "default_initial_size")]
    pub initial_size: usize,
    #[serde(default = "default_size_step")]
    pub size_step: usize,
    #[serde(default = "default_curve_points")]
    pub curve_points: usize,
    #[serde(default = "default_pivot_epsilon")]
    pub pivot_epsilon: f64,
    #[serde(default)]
    pub sort: SortAlgorithm,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_bucket_count() -> usize {
    20
}
fn default_trials_per_bucket() -> usize {
    10
}
fn default_initial_size() -> usize {
    10_000
}
fn default_size_step() -> usize {
    10_000
}
fn default_curve_points() -> usize {
    1000
}
fn default_pivot_epsilon() -> f64 {
    DEFAULT_PIVOT_EPSILON
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_count: default_bucket_count(),
            trials_per_bucket: default_trials_per_bucket(),
            initial_size: default_initial_size(),
            size_step: default_size_step(),
            curve_points: default_curve_points(),
            pivot_epsilon: default_pivot_epsilon(),
            sort: SortAlgorithm::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Loads the user config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sortfit")
            .join("config.toml")
    }

    /// Largest benchmarked size, or `None` on overflow or zero buckets.
    pub fn largest_size(&self) -> Option<usize> {
        let steps = self.bucket_count.checked_sub(1)?;
        steps
            .checked_mul(self.size_step)?
            .checked_add(self.initial_size)
    }

    pub fn validate(&self) -> Result<(), EstimateError> {
        let invalid = |msg: &str| Err(EstimateError::InvalidConfig(msg.to_string()));

        if self.bucket_count == 0 {
            return invalid("bucket_count must be at least 1");
        }
        if self.trials_per_bucket == 0 {
            return invalid("trials_per_bucket must be at least 1");
        }
        if self.initial_size == 0 {
            return invalid("initial_size must be at least 1");
        }
        // Sizes must strictly increase from bucket to bucket
        if self.size_step == 0 {
            return invalid("size_step must be at least 1");
        }
        if self.curve_points < 2 {
            return invalid("curve_points must be at least 2");
        }
        if !self.pivot_epsilon.is_finite() || self.pivot_epsilon < 0.0 {
            return invalid("pivot_epsilon must be a finite, non-negative number");
        }
        let target = self
            .largest_size()
            .and_then(|n| n.checked_mul(crate::engine::estimator::TARGET_FACTOR));
        if target.is_none() {
            return invalid("benchmark sizes overflow");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bucket_count, 20);
        assert_eq!(config.trials_per_bucket, 10);
        assert_eq!(config.initial_size, 10_000);
        assert_eq!(config.size_step, 10_000);
        assert_eq!(config.curve_points, 1000);
        assert_eq!(config.sort, SortAlgorithm::Shell);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
bucket_count = 5
sort = "hibbard"
seed = 42
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bucket_count, 5);
        assert_eq!(config.sort, SortAlgorithm::Hibbard);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.trials_per_bucket, 10);
        assert_eq!(config.pivot_epsilon, DEFAULT_PIVOT_EPSILON);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            seed: Some(7),
            ..Config::default()
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
        assert_eq!(Config::default().largest_size(), Some(200_000));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        for config in [
            Config {
                bucket_count: 0,
                ..Config::default()
            },
            Config {
                trials_per_bucket: 0,
                ..Config::default()
            },
            Config {
                initial_size: 0,
                ..Config::default()
            },
            Config {
                size_step: 0,
                ..Config::default()
            },
            Config {
                curve_points: 1,
                ..Config::default()
            },
        ] {
            assert!(matches!(
                config.validate(),
                Err(EstimateError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_validate_rejects_bad_epsilon() {
        for eps in [-1.0, f64::NAN, f64::INFINITY] {
            let config = Config {
                pivot_epsilon: eps,
                ..Config::default()
            };
            assert!(config.validate().is_err(), "epsilon {eps}");
        }
        let exact = Config {
            pivot_epsilon: 0.0,
            ..Config::default()
        };
        assert!(exact.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_overflowing_sizes() {
        let config = Config {
            initial_size: usize::MAX / 2,
            size_step: usize::MAX / 2,
            bucket_count: 3,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "trials_per_bucket = 3\ncurve_points = 200\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.trials_per_bucket, 3);
        assert_eq!(config.curve_points, 200);
        assert_eq!(config.bucket_count, 20);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn test_load_from_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "bucket_count = \"many\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
