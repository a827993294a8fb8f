// src/config/preprocessing_config.rs
//! Preprocessing pipeline configuration structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::config::constants::pipeline;
use crate::error::{PreprocessError, PreprocessResult};
use crate::processing::wavelet::{PeriodicDwt, WaveletTransform};

/// Parameter set consumed by [`PreprocessingPipeline`](crate::processing::PreprocessingPipeline)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PreprocessingConfig {
    /// Quality gate in decibels; signals below it are processed with a warning
    #[serde(default = "defaults::snr_threshold")]
    pub snr_threshold: f64,

    /// Wavelet basis, looked up in the transform's catalog
    #[serde(default = "defaults::wavelet_name")]
    pub wavelet_name: String,

    #[serde(default = "defaults::decomposition_level")]
    pub decomposition_level: usize,

    #[serde(default = "defaults::normalization_method")]
    pub normalization_method: NormalizationMethod,

    #[serde(default = "defaults::use_parallel")]
    pub use_parallel: bool,

    /// Upper bound on worker threads for one batch call
    #[serde(default = "defaults::n_workers")]
    pub n_workers: usize,

    /// Informational only; batches are not chunked by it
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,
}

/// Rescaling policy applied after denoising
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMethod {
    /// Zero mean, unit standard deviation
    Standard,
    /// Rescale into [0, 1]
    MinMax,
    /// Median-centred, scaled by the median absolute deviation
    Robust,
}

impl NormalizationMethod {
    /// Every accepted method name
    pub const NAMES: [&'static str; 3] = ["standard", "minmax", "robust"];

    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationMethod::Standard => "standard",
            NormalizationMethod::MinMax => "minmax",
            NormalizationMethod::Robust => "robust",
        }
    }
}

impl fmt::Display for NormalizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalizationMethod {
    type Err = PreprocessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(NormalizationMethod::Standard),
            "minmax" => Ok(NormalizationMethod::MinMax),
            "robust" => Ok(NormalizationMethod::Robust),
            other => {
                error!(method = other, "unknown normalization method");
                Err(PreprocessError::config(
                    "normalization_method",
                    format!(
                        "unknown normalization method '{}', expected one of {:?}",
                        other,
                        Self::NAMES
                    ),
                ))
            }
        }
    }
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            snr_threshold: defaults::snr_threshold(),
            wavelet_name: defaults::wavelet_name(),
            decomposition_level: defaults::decomposition_level(),
            normalization_method: defaults::normalization_method(),
            use_parallel: defaults::use_parallel(),
            n_workers: defaults::n_workers(),
            batch_size: defaults::batch_size(),
        }
    }
}

impl PreprocessingConfig {
    /// Validate against the built-in wavelet catalog
    pub fn validate(&self) -> PreprocessResult<()> {
        validate_preprocessing_config(self, &PeriodicDwt)
    }
}

/// Default value providers using constants
mod defaults {
    use super::NormalizationMethod;
    use crate::config::constants::pipeline::*;

    pub fn snr_threshold() -> f64 { DEFAULT_SNR_THRESHOLD_DB }
    pub fn wavelet_name() -> String { DEFAULT_WAVELET.to_string() }
    pub fn decomposition_level() -> usize { DEFAULT_DECOMPOSITION_LEVEL }
    pub fn normalization_method() -> NormalizationMethod { NormalizationMethod::Standard }
    pub fn use_parallel() -> bool { true }
    pub fn n_workers() -> usize { DEFAULT_N_WORKERS }
    pub fn batch_size() -> usize { DEFAULT_BATCH_SIZE }
}

/// Validate a preprocessing configuration, reporting the first violation.
///
/// Checks run in a fixed order: SNR threshold, decomposition level, wavelet
/// name, worker count, batch size.
pub fn validate_preprocessing_config(
    config: &PreprocessingConfig,
    transform: &dyn WaveletTransform,
) -> PreprocessResult<()> {
    let violation = if config.snr_threshold.is_nan() || config.snr_threshold <= 0.0 {
        Some(PreprocessError::config(
            "snr_threshold",
            format!("must be positive, got {}", config.snr_threshold),
        ))
    } else if config.decomposition_level < pipeline::MIN_DECOMPOSITION_LEVEL {
        Some(PreprocessError::config(
            "decomposition_level",
            format!(
                "must be at least {}, got {}",
                pipeline::MIN_DECOMPOSITION_LEVEL,
                config.decomposition_level
            ),
        ))
    } else if !transform.is_known_wavelet(&config.wavelet_name) {
        Some(PreprocessError::config(
            "wavelet_name",
            format!(
                "'{}' is not a known discrete wavelet, expected one of {:?}",
                config.wavelet_name,
                transform.wavelet_names()
            ),
        ))
    } else if config.n_workers < pipeline::MIN_N_WORKERS {
        Some(PreprocessError::config(
            "n_workers",
            format!("must be at least {}, got {}", pipeline::MIN_N_WORKERS, config.n_workers),
        ))
    } else if config.batch_size < pipeline::MIN_BATCH_SIZE {
        Some(PreprocessError::config(
            "batch_size",
            format!("must be at least {}, got {}", pipeline::MIN_BATCH_SIZE, config.batch_size),
        ))
    } else {
        None
    };

    match violation {
        Some(err) => {
            error!(error = %err, "rejected preprocessing configuration");
            Err(err)
        }
        None => Ok(()),
    }
}
