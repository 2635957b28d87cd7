//! Experiment parameters and the window configuration derived from them.

use std::fmt::{Display, Formatter};
use std::path::Path;

use serde::{Deserialize, Serialize};

const DEFAULT_TIME: f64 = 80.0;
const DEFAULT_SAMPLE_INTERVAL: f64 = 1e-6;
const DEFAULT_TRANSLATOR_SPEED: f64 = 0.008;
const DEFAULT_WAVELENGTH: f64 = 1550e-9;
const DEFAULT_PERIOD_COUNT: usize = 1;

/// Error type for experiment parameter loading and validation.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    InvalidParameter { name: &'static str, value: f64 },
    EmptyWindow { spatial_step: f64, wavelength: f64 },
    WindowTooLarge { samples_per_period: f64, period_count: usize },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Parse(err) => write!(f, "failed to parse parameters: {}", err),
            Self::InvalidParameter { name, value } => {
                write!(f, "{} must be finite and positive, got {}", name, value)
            }
            Self::EmptyWindow {
                spatial_step,
                wavelength,
            } => write!(
                f,
                "wavelength {} m is shorter than one sample step of {} m",
                wavelength, spatial_step
            ),
            Self::WindowTooLarge {
                samples_per_period,
                period_count,
            } => write!(
                f,
                "window of {} periods of {} samples overflows the sample index",
                period_count, samples_per_period
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Acquisition parameters of one scan, as supplied by the experimenter.
///
/// Missing fields fall back to the bench setup defaults: an 80 s scan sampled
/// every microsecond with the translator at 8 mm/s and a 1550 nm source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentParameters {
    /// Total acquisition time in seconds. Only used for axis scaling.
    pub time: f64,
    /// Seconds per sample.
    pub sample_interval: f64,
    /// Translator speed in meters per second.
    pub translator_speed: f64,
    /// Source wavelength in meters.
    pub wavelength: f64,
    /// Fringe periods per analysis window.
    pub period_count: usize,
}

impl Default for ExperimentParameters {
    fn default() -> Self {
        Self {
            time: DEFAULT_TIME,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            translator_speed: DEFAULT_TRANSLATOR_SPEED,
            wavelength: DEFAULT_WAVELENGTH,
            period_count: DEFAULT_PERIOD_COUNT,
        }
    }
}

impl ExperimentParameters {
    /// Parse parameters from a JSON object. Absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Read and parse a JSON parameter file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Total optical path covered by the translator, in meters.
    pub fn length(&self) -> f64 {
        self.time * self.translator_speed
    }

    /// Number of samples the acquisition is expected to produce.
    pub fn expected_samples(&self) -> u64 {
        (self.time / self.sample_interval).round() as u64
    }
}

/// Immutable windowing setup shared read-only by every file pipeline in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowConfig {
    sample_interval: f64,
    translator_speed: f64,
    wavelength: f64,
    period_count: usize,
    spatial_step: f64,
    window_size: usize,
}

impl WindowConfig {
    /// Derive the window configuration from experiment parameters.
    ///
    /// `window_size = floor(wavelength / spatial_step) * period_count`, where
    /// `spatial_step = translator_speed * sample_interval`.
    ///
    /// # Errors
    /// Returns an error if a parameter is not finite and positive, or if the
    /// resulting window would hold no samples or more than `usize::MAX`.
    pub fn from_parameters(params: &ExperimentParameters) -> Result<Self, ConfigError> {
        check_positive("sample_interval", params.sample_interval)?;
        check_positive("translator_speed", params.translator_speed)?;
        check_positive("wavelength", params.wavelength)?;
        if params.period_count == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "period_count",
                value: 0.0,
            });
        }

        let spatial_step = params.translator_speed * params.sample_interval;
        let samples_per_period = (params.wavelength / spatial_step).floor();
        if !samples_per_period.is_finite() || samples_per_period < 1.0 {
            return Err(ConfigError::EmptyWindow {
                spatial_step,
                wavelength: params.wavelength,
            });
        }

        let window_size = Some(samples_per_period)
            .filter(|&n| n < usize::MAX as f64)
            .and_then(|n| (n as usize).checked_mul(params.period_count))
            .ok_or(ConfigError::WindowTooLarge {
                samples_per_period,
                period_count: params.period_count,
            })?;

        Ok(Self {
            sample_interval: params.sample_interval,
            translator_speed: params.translator_speed,
            wavelength: params.wavelength,
            period_count: params.period_count,
            spatial_step,
            window_size,
        })
    }

    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    pub fn translator_speed(&self) -> f64 {
        self.translator_speed
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn period_count(&self) -> usize {
        self.period_count
    }

    /// Meters of optical path per sample.
    pub fn spatial_step(&self) -> f64 {
        self.spatial_step
    }

    /// Samples per analysis window. Always at least 1.
    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bench_setup() {
        let params = ExperimentParameters::default();
        let config = WindowConfig::from_parameters(&params).expect("config");
        // 1550 nm / 8 nm per sample
        assert_eq!(config.window_size(), 193);
        assert!((params.length() - 0.64).abs() < 1e-12);
        assert_eq!(params.expected_samples(), 80_000_000);
    }

    #[test]
    fn period_count_scales_window() {
        let params = ExperimentParameters {
            translator_speed: 0.016,
            period_count: 10,
            ..ExperimentParameters::default()
        };
        let config = WindowConfig::from_parameters(&params).expect("config");
        assert_eq!(config.window_size(), 96 * 10);
        assert!((config.spatial_step() - 1.6e-8).abs() < 1e-20);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let params =
            ExperimentParameters::from_json_str(r#"{"period_count": 30, "time": 40.0}"#)
                .expect("parse");
        assert_eq!(params.period_count, 30);
        assert_eq!(params.time, 40.0);
        assert_eq!(params.wavelength, DEFAULT_WAVELENGTH);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ExperimentParameters::from_json_str("{\"time\": \"soon\"}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_non_positive_parameters() {
        let params = ExperimentParameters {
            translator_speed: 0.0,
            ..ExperimentParameters::default()
        };
        let err = WindowConfig::from_parameters(&params).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "translator_speed",
                ..
            }
        ));

        let params = ExperimentParameters {
            sample_interval: f64::NAN,
            ..ExperimentParameters::default()
        };
        assert!(WindowConfig::from_parameters(&params).is_err());

        let params = ExperimentParameters {
            period_count: 0,
            ..ExperimentParameters::default()
        };
        assert!(WindowConfig::from_parameters(&params).is_err());
    }

    #[test]
    fn rejects_window_shorter_than_one_sample() {
        let params = ExperimentParameters {
            wavelength: 1e-9,
            ..ExperimentParameters::default()
        };
        let err = WindowConfig::from_parameters(&params).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyWindow { .. }));
    }

    #[test]
    fn rejects_window_too_large_to_index() {
        let params = ExperimentParameters {
            sample_interval: 1e-6,
            translator_speed: 1e-3,
            wavelength: 1.0,
            period_count: usize::MAX / 2,
            ..ExperimentParameters::default()
        };
        let err = WindowConfig::from_parameters(&params).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WindowTooLarge {
                period_count,
                ..
            } if period_count == usize::MAX / 2
        ));

        let params = ExperimentParameters {
            wavelength: 1e300,
            ..ExperimentParameters::default()
        };
        let err = WindowConfig::from_parameters(&params).unwrap_err();
        assert!(matches!(err, ConfigError::WindowTooLarge { .. }));
    }
}
