// src/config/mod.rs
//! Configuration management for the preprocessing pipeline

pub mod constants;
pub mod loader;
pub mod preprocessing_config;

pub use loader::{ConfigError, ConfigLoader};
pub use preprocessing_config::*;
