// src/error.rs
//! Unified error handling for the preprocessing core
//!
//! Every stage reports failures through [`PreprocessError`]. Errors are logged
//! where they are raised and then propagated with `?`; nothing is swallowed and
//! nothing is retried. A low SNR is not an error and never shows up here.

use thiserror::Error;

use crate::processing::wavelet::TransformError;

/// Unified error type for the preprocessing pipeline
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// Invalid configuration, caught at construction or at method dispatch
    #[error("[CONFIG] invalid `{parameter}`: {reason}")]
    Config {
        /// Offending configuration parameter
        parameter: String,
        /// What is wrong with it
        reason: String,
    },

    /// Statistics could not be computed from the input
    #[error("[NUMERIC] {operation} failed: {reason}")]
    Numeric {
        /// Statistic being computed
        operation: String,
        /// Why it could not be computed
        reason: String,
    },

    /// Wavelet decomposition or reconstruction failed
    #[error("[DENOISING] wavelet `{wavelet}` at level {level} failed: {source}")]
    Denoising {
        /// Wavelet basis in use
        wavelet: String,
        /// Requested decomposition level
        level: usize,
        /// Underlying transform failure
        #[source]
        source: TransformError,
    },
}

impl PreprocessError {
    /// Build a configuration error
    pub fn config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        PreprocessError::Config {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Build a numeric error
    pub fn numeric(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        PreprocessError::Numeric {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Build a denoising error wrapping a transform failure
    pub fn denoising(wavelet: impl Into<String>, level: usize, source: TransformError) -> Self {
        PreprocessError::Denoising {
            wavelet: wavelet.into(),
            level,
            source,
        }
    }

    /// True for configuration errors
    pub fn is_config(&self) -> bool {
        matches!(self, PreprocessError::Config { .. })
    }

    /// True for numeric errors
    pub fn is_numeric(&self) -> bool {
        matches!(self, PreprocessError::Numeric { .. })
    }

    /// True for denoising errors
    pub fn is_denoising(&self) -> bool {
        matches!(self, PreprocessError::Denoising { .. })
    }
}

/// Result type alias for preprocessing operations
pub type PreprocessResult<T> = Result<T, PreprocessError>;
