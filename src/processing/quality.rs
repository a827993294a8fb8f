// src/processing/quality.rs
//! Per-signal quality statistics
//!
//! Every processed signal gets a [`SignalId`] from its pipeline and one
//! [`QualityStats`] entry in the pipeline's [`QualityRecorder`]. Ids are never
//! reused by a pipeline, so concurrent workers always write distinct keys; the
//! recorder's mutex serializes the writes themselves.

use std::collections::BTreeMap;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Pipeline-assigned identity of one processed signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SignalId(pub u64);

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "signal-{}", self.0)
    }
}

/// Quality record of one processed signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityStats {
    pub snr_db: f64,
    pub noise_level: f64,
    pub original_length: usize,
    pub processed_length: usize,
}

/// Aggregate view over all recorded signals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QualitySummary {
    pub signals: usize,
    /// Signals whose SNR fell below the configured threshold
    pub low_snr_signals: usize,
    /// Mean over finite SNR values only; `None` when there are none
    pub mean_snr_db: Option<f64>,
    pub min_snr_db: Option<f64>,
    pub mean_noise_level: Option<f64>,
}

/// Thread-safe accumulator of [`QualityStats`]
#[derive(Debug, Default)]
pub struct QualityRecorder {
    entries: Mutex<BTreeMap<SignalId, QualityStats>>,
}

impl QualityRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, id: SignalId, stats: QualityStats) {
        self.entries.lock().insert(id, stats);
    }

    /// Copy of every entry, ordered by id
    pub fn snapshot(&self) -> BTreeMap<SignalId, QualityStats> {
        self.entries.lock().clone()
    }

    pub fn get(&self, id: SignalId) -> Option<QualityStats> {
        self.entries.lock().get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Summarize the recorded entries against an SNR threshold
    pub fn summarize(&self, snr_threshold: f64) -> QualitySummary {
        let entries = self.entries.lock();
        if entries.is_empty() {
            return QualitySummary::default();
        }

        let low_snr_signals = entries.values().filter(|s| s.snr_db < snr_threshold).count();
        let finite_snr: Vec<f64> = entries
            .values()
            .map(|s| s.snr_db)
            .filter(|snr| snr.is_finite())
            .collect();

        let mean_snr_db = if finite_snr.is_empty() {
            None
        } else {
            Some(finite_snr.iter().sum::<f64>() / finite_snr.len() as f64)
        };
        let min_snr_db = entries.values().map(|s| s.snr_db).reduce(f64::min);
        let mean_noise_level =
            Some(entries.values().map(|s| s.noise_level).sum::<f64>() / entries.len() as f64);

        QualitySummary {
            signals: entries.len(),
            low_snr_signals,
            mean_snr_db,
            min_snr_db,
            mean_noise_level,
        }
    }
}
