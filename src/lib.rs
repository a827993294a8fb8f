//! signal-preprocess: wavelet denoising and normalization of 1-D signals
//!
//! Prepares raw time-series (for example radio telescope traces) for a
//! downstream classifier:
//!
//! - Robust noise-floor and SNR estimation (MAD / IQR)
//! - Multilevel wavelet shrinkage with the universal threshold
//! - Standard, min-max and robust normalization
//! - Sequential or parallel batch processing with per-signal quality records
//! - Layered TOML/JSON configuration with environment overrides
//!
//! # Quick Start
//!
//! ```rust
//! use signal_preprocess::config::PreprocessingConfig;
//! use signal_preprocess::processing::PreprocessingPipeline;
//! use signal_preprocess::simulation::SignalGenerator;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = PreprocessingPipeline::new(PreprocessingConfig::default())?;
//!
//!     let mut generator = SignalGenerator::with_seed(42);
//!     let batch = generator.burst_batch(8, 1024, 1.0);
//!
//!     let processed = pipeline.process_batch(&batch)?;
//!     assert_eq!(processed.len(), 8);
//!
//!     let summary = pipeline.summary();
//!     println!("{} signals, {} below the SNR gate", summary.signals, summary.low_snr_signals);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod error;
pub mod processing;
pub mod simulation;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ConfigLoader, NormalizationMethod, PreprocessingConfig};
pub use error::{PreprocessError, PreprocessResult};
pub use processing::{
    NoiseAssessment, NoiseEstimator, PreprocessingPipeline, ProcessedSignal, QualityStats,
    QualitySummary, SignalId, SignalNormalizer, WaveletDenoiser, WaveletTransform,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Wavelet denoising and normalization of 1-D time-series signals".to_string(),
        wavelets: processing::wavelet::WAVELET_NAMES
            .iter()
            .map(|name| name.to_string())
            .collect(),
        normalization_methods: NormalizationMethod::NAMES
            .iter()
            .map(|name| name.to_string())
            .collect(),
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// Wavelets known to the built-in transform
    pub wavelets: Vec<String>,
    /// Accepted normalization method names
    pub normalization_methods: Vec<String>,
}
