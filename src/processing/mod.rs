// src/processing/mod.rs
//! Denoising, normalization and quality tracking for 1-D signals

pub mod denoiser;
pub mod noise_estimation;
pub mod normalization;
pub mod pipeline;
pub mod quality;
pub mod wavelet;

pub use denoiser::WaveletDenoiser;
pub use noise_estimation::{NoiseAssessment, NoiseEstimator};
pub use normalization::SignalNormalizer;
pub use pipeline::{PreprocessingPipeline, ProcessedSignal};
pub use quality::{QualityRecorder, QualityStats, QualitySummary, SignalId};
pub use wavelet::{Decomposition, PeriodicDwt, TransformError, WaveletTransform};
