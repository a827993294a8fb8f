// src/utils/mod.rs
//! Shared numeric helpers

pub mod statistics;
