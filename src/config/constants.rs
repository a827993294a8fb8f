// src/config/constants.rs
//! Crate-wide constants, grouped by concern

/// Robust statistics constants
pub mod statistics {
    /// Converts a median absolute deviation into a Gaussian standard deviation
    pub const MAD_TO_SIGMA: f64 = 1.4826;
    /// Converts an interquartile range into a Gaussian standard deviation
    pub const IQR_TO_SIGMA: f64 = 0.7413;
    /// Lower quartile, in percent
    pub const LOWER_QUARTILE_PERCENT: f64 = 25.0;
    /// Upper quartile, in percent
    pub const UPPER_QUARTILE_PERCENT: f64 = 75.0;
}

/// Normalization constants
pub mod normalization {
    /// Added to every normalization denominator; never to the numerator
    pub const EPSILON: f64 = 1e-10;
}

/// Pipeline defaults
pub mod pipeline {
    pub const DEFAULT_SNR_THRESHOLD_DB: f64 = 10.0;
    pub const DEFAULT_WAVELET: &str = "db4";
    pub const DEFAULT_DECOMPOSITION_LEVEL: usize = 4;
    pub const DEFAULT_N_WORKERS: usize = 4;
    pub const DEFAULT_BATCH_SIZE: usize = 32;
    pub const MIN_DECOMPOSITION_LEVEL: usize = 1;
    pub const MIN_N_WORKERS: usize = 1;
    pub const MIN_BATCH_SIZE: usize = 1;

    /// Name prefix for batch worker threads
    pub const WORKER_THREAD_PREFIX: &str = "preprocess-worker";
}

/// Configuration file handling
pub mod paths {
    pub const LOCAL_CONFIG_FILE: &str = "preprocess.toml";
    pub const TOML_EXTENSION: &str = "toml";
    pub const JSON_EXTENSION: &str = "json";

    /// Environment variables with this prefix override file values
    pub const ENV_PREFIX: &str = "PREPROCESS_";
}
