// src/processing/wavelet/mod.rs
//! Discrete wavelet transform seam
//!
//! The denoiser only needs three things from a wavelet library: split a signal
//! into one approximation plus per-level detail coefficients, put it back
//! together, and say whether a basis name is known. [`WaveletTransform`] is
//! that contract. [`PeriodicDwt`] is the implementation shipped with the crate.

pub mod catalog;
pub mod transform;

pub use catalog::{WaveletFilter, WAVELET_NAMES};
pub use transform::PeriodicDwt;

use thiserror::Error;

/// Multiresolution coefficients of one signal
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Coarsest-scale approximation coefficients
    pub approximation: Vec<f64>,
    /// Detail coefficients, `details[0]` is level 1 (finest scale)
    pub details: Vec<Vec<f64>>,
}

impl Decomposition {
    /// Number of decomposition levels
    pub fn levels(&self) -> usize {
        self.details.len()
    }
}

/// Wavelet transform failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("unknown wavelet '{0}'")]
    UnknownWavelet(String),

    #[error("cannot decompose an empty signal")]
    EmptySignal,

    #[error("level {requested} exceeds the maximum of {max_level} for a {length}-sample signal")]
    LevelTooHigh {
        requested: usize,
        max_level: usize,
        length: usize,
    },

    #[error("coefficient length mismatch at level {level}: approximation has {approximation}, detail has {detail}")]
    CoefficientMismatch {
        level: usize,
        approximation: usize,
        detail: usize,
    },
}

/// Forward/inverse discrete wavelet transform with a basis catalog
pub trait WaveletTransform: Send + Sync {
    /// Whether `name` is in the discrete-wavelet catalog
    fn is_known_wavelet(&self, name: &str) -> bool;

    /// Catalog contents, for error messages
    fn wavelet_names(&self) -> Vec<&str>;

    /// Decompose `signal` into `levels` detail arrays plus one approximation
    fn decompose(
        &self,
        signal: &[f64],
        wavelet: &str,
        levels: usize,
    ) -> Result<Decomposition, TransformError>;

    /// Rebuild a signal from its coefficients.
    ///
    /// The result may be longer than the signal that was decomposed; callers
    /// trim it.
    fn reconstruct(
        &self,
        decomposition: &Decomposition,
        wavelet: &str,
    ) -> Result<Vec<f64>, TransformError>;
}
