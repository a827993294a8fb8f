//! Synthetic signal sources
//! Location: src/simulation/mod.rs

pub mod noise_models;
pub mod signal_generator;

pub use noise_models::GaussianNoise;
pub use signal_generator::SignalGenerator;
