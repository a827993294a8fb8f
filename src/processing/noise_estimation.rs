// src/processing/noise_estimation.rs
//! Robust noise-floor and SNR estimation
//!
//! Two robust spread statistics are converted into Gaussian sigma estimates
//! and the smaller one wins:
//!
//! - `1.4826 * MAD`
//! - `0.7413 * IQR`
//!
//! A strong, narrow transient inflates one of them more than the other, and the
//! transient is exactly what the downstream classifier wants preserved.

use tracing::{debug, error};

use crate::config::constants::statistics::{IQR_TO_SIGMA, MAD_TO_SIGMA};
use crate::error::{PreprocessError, PreprocessResult};
use crate::utils::statistics;

/// Noise level and SNR of one signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseAssessment {
    /// Estimated noise standard deviation, never negative
    pub noise_level: f64,
    /// `10 * log10(mean(x^2) / noise_level^2)`, `+inf` when the noise level is zero.
    /// Never NaN.
    pub snr_db: f64,
}

/// Robust noise estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseEstimator;

impl NoiseEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate the noise standard deviation of `data`
    pub fn estimate_noise(&self, data: &[f64]) -> PreprocessResult<f64> {
        if data.is_empty() {
            let err = PreprocessError::numeric("estimate_noise", "signal is empty");
            error!(error = %err, "noise estimation failed");
            return Err(err);
        }

        let non_finite = statistics::count_non_finite(data);
        if non_finite > 0 {
            let err = PreprocessError::numeric(
                "estimate_noise",
                format!("signal contains {} non-finite samples out of {}", non_finite, data.len()),
            );
            error!(error = %err, "noise estimation failed");
            return Err(err);
        }

        // MAD and IQR are scale-equivariant; work on max-abs-scaled samples so
        // deviations of huge inputs cannot overflow
        let scale = statistics::max_abs(data).unwrap_or(0.0);
        if scale == 0.0 {
            debug!(noise_level = 0.0, "all-zero signal");
            return Ok(0.0);
        }
        let scaled: Vec<f64> = data.iter().map(|&x| x / scale).collect();

        let (mad, iqr) = match (
            statistics::median_absolute_deviation(&scaled),
            statistics::interquartile_range(&scaled),
        ) {
            (Some(mad), Some(iqr)) => (mad, iqr),
            _ => {
                let err = PreprocessError::numeric("estimate_noise", "dispersion is undefined");
                error!(error = %err, "noise estimation failed");
                return Err(err);
            }
        };

        let mad_sigma = MAD_TO_SIGMA * mad;
        let iqr_sigma = IQR_TO_SIGMA * iqr;
        let noise_level = scale * mad_sigma.min(iqr_sigma).max(0.0);

        if !noise_level.is_finite() {
            let err = PreprocessError::numeric(
                "estimate_noise",
                format!("noise level overflows for samples up to {:e}", scale),
            );
            error!(error = %err, "noise estimation failed");
            return Err(err);
        }

        debug!(mad_sigma, iqr_sigma, noise_level, "estimated noise level");
        Ok(noise_level)
    }

    /// Signal-to-noise ratio in decibels
    pub fn calculate_snr(&self, data: &[f64]) -> PreprocessResult<f64> {
        Ok(self.assess(data)?.snr_db)
    }

    /// Noise level and SNR from a single noise estimate.
    ///
    /// The ratio is taken in the amplitude domain, `20 * log10(rms / sigma)`,
    /// which equals the power form without squaring either side.
    pub fn assess(&self, data: &[f64]) -> PreprocessResult<NoiseAssessment> {
        let noise_level = self.estimate_noise(data)?;
        let rms = statistics::root_mean_square(data).unwrap_or(0.0);

        let snr_db = if noise_level > 0.0 {
            20.0 * (rms / noise_level).log10()
        } else {
            f64::INFINITY
        };

        if snr_db.is_nan() {
            let err = PreprocessError::numeric(
                "calculate_snr",
                format!("SNR undefined for rms {:e} and noise level {:e}", rms, noise_level),
            );
            error!(error = %err, "SNR estimation failed");
            return Err(err);
        }

        Ok(NoiseAssessment { noise_level, snr_db })
    }
}
