// src/processing/denoiser.rs
//! Wavelet shrinkage denoising
//!
//! Detail coefficients at every level are soft-thresholded with the universal
//! (VisuShrink) threshold `sigma * sqrt(2 * ln(n_i))`, where `sigma` is the
//! noise level of the original signal and `n_i` the number of coefficients at
//! level `i`. Approximation coefficients pass through untouched.

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{PreprocessError, PreprocessResult};
use crate::processing::noise_estimation::NoiseEstimator;
use crate::processing::wavelet::{Decomposition, PeriodicDwt, TransformError, WaveletTransform};

/// Wavelet denoiser driving an external [`WaveletTransform`]
#[derive(Clone)]
pub struct WaveletDenoiser {
    transform: Arc<dyn WaveletTransform>,
    noise_estimator: NoiseEstimator,
}

impl Default for WaveletDenoiser {
    fn default() -> Self {
        Self::new(Arc::new(PeriodicDwt::new()))
    }
}

impl std::fmt::Debug for WaveletDenoiser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveletDenoiser")
            .field("wavelets", &self.transform.wavelet_names())
            .finish()
    }
}

impl WaveletDenoiser {
    pub fn new(transform: Arc<dyn WaveletTransform>) -> Self {
        Self {
            transform,
            noise_estimator: NoiseEstimator::new(),
        }
    }

    /// The transform this denoiser decomposes with
    pub fn transform(&self) -> &Arc<dyn WaveletTransform> {
        &self.transform
    }

    /// Denoise `data`, returning exactly `data.len()` samples
    pub fn denoise(
        &self,
        data: &[f64],
        wavelet_name: &str,
        decomposition_level: usize,
    ) -> PreprocessResult<Vec<f64>> {
        // Fail on the transform before paying for the noise estimate
        let decomposition = self.decompose(data, wavelet_name, decomposition_level)?;
        let noise_sigma = self.noise_estimator.estimate_noise(data)?;
        self.shrink_and_rebuild(data.len(), decomposition, wavelet_name, decomposition_level, noise_sigma)
    }

    /// Denoise with a noise level already estimated from `data`
    pub fn denoise_with_noise(
        &self,
        data: &[f64],
        wavelet_name: &str,
        decomposition_level: usize,
        noise_sigma: f64,
    ) -> PreprocessResult<Vec<f64>> {
        let decomposition = self.decompose(data, wavelet_name, decomposition_level)?;
        self.shrink_and_rebuild(data.len(), decomposition, wavelet_name, decomposition_level, noise_sigma)
    }

    /// Universal threshold for `coefficient_count` coefficients
    pub fn universal_threshold(noise_sigma: f64, coefficient_count: usize) -> f64 {
        if coefficient_count <= 1 {
            return 0.0;
        }
        noise_sigma * (2.0 * (coefficient_count as f64).ln()).sqrt()
    }

    /// `sign(c) * max(|c| - threshold, 0)`
    pub fn soft_threshold(coefficient: f64, threshold: f64) -> f64 {
        coefficient.signum() * (coefficient.abs() - threshold).max(0.0)
    }

    fn decompose(
        &self,
        data: &[f64],
        wavelet_name: &str,
        level: usize,
    ) -> PreprocessResult<Decomposition> {
        self.transform
            .decompose(data, wavelet_name, level)
            .map_err(|source| Self::fail(wavelet_name, level, "decompose", source))
    }

    fn shrink_and_rebuild(
        &self,
        original_length: usize,
        mut decomposition: Decomposition,
        wavelet_name: &str,
        level: usize,
        noise_sigma: f64,
    ) -> PreprocessResult<Vec<f64>> {
        for (index, details) in decomposition.details.iter_mut().enumerate() {
            let threshold = Self::universal_threshold(noise_sigma, details.len());
            details
                .iter_mut()
                .for_each(|c| *c = Self::soft_threshold(*c, threshold));
            debug!(level = index + 1, coefficients = details.len(), threshold, "thresholded detail level");
        }

        let mut reconstructed = self
            .transform
            .reconstruct(&decomposition, wavelet_name)
            .map_err(|source| Self::fail(wavelet_name, level, "reconstruct", source))?;

        reconstructed.resize(original_length, 0.0);
        Ok(reconstructed)
    }

    fn fail(wavelet_name: &str, level: usize, stage: &str, source: TransformError) -> PreprocessError {
        error!(wavelet = wavelet_name, level, stage, error = %source, "wavelet transform failed");
        PreprocessError::denoising(wavelet_name, level, source)
    }
}
