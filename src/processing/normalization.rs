// src/processing/normalization.rs
//! Rescaling of denoised signals into a standard numeric range

use tracing::debug;

use crate::config::constants::normalization::EPSILON;
use crate::config::NormalizationMethod;
use crate::error::PreprocessResult;
use crate::utils::statistics;

/// Applies one of the [`NormalizationMethod`] policies.
///
/// `EPSILON` is added to every denominator so constant signals map to zeros
/// instead of dividing by zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalNormalizer;

impl SignalNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, data: &[f64], method: NormalizationMethod) -> Vec<f64> {
        if data.is_empty() {
            return Vec::new();
        }

        let (center, scale) = match method {
            NormalizationMethod::Standard => (
                statistics::mean(data).unwrap_or(0.0),
                statistics::std_dev(data).unwrap_or(0.0),
            ),
            NormalizationMethod::MinMax => {
                let (min, max) = statistics::min_max(data).unwrap_or((0.0, 0.0));
                (min, max - min)
            }
            NormalizationMethod::Robust => (
                statistics::median(data).unwrap_or(0.0),
                statistics::median_absolute_deviation(data).unwrap_or(0.0),
            ),
        };

        debug!(%method, center, scale, "normalizing signal");

        let denominator = scale + EPSILON;
        data.iter().map(|&x| (x - center) / denominator).collect()
    }

    /// Normalize with a method given by name.
    ///
    /// Fails with a configuration error naming the value when it is not one of
    /// `standard`, `minmax` or `robust`.
    pub fn normalize_named(&self, data: &[f64], method: &str) -> PreprocessResult<Vec<f64>> {
        let method = method.parse::<NormalizationMethod>()?;
        Ok(self.normalize(data, method))
    }
}
