// src/processing/pipeline.rs
//! Batch preprocessing pipeline
//!
//! Per signal: noise/SNR assessment, SNR gate (warning only), wavelet
//! denoising, normalization, quality record. Batches run sequentially or on a
//! worker pool that lives only for the duration of one [`PreprocessingPipeline::process_batch`]
//! call.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, error, warn};

use crate::config::constants::pipeline::WORKER_THREAD_PREFIX;
use crate::config::{validate_preprocessing_config, PreprocessingConfig};
use crate::error::{PreprocessError, PreprocessResult};
use crate::processing::denoiser::WaveletDenoiser;
use crate::processing::noise_estimation::NoiseEstimator;
use crate::processing::normalization::SignalNormalizer;
use crate::processing::quality::{QualityRecorder, QualityStats, QualitySummary, SignalId};
use crate::processing::wavelet::{PeriodicDwt, WaveletTransform};

/// Output of the pipeline for one input signal
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSignal {
    /// Key of this signal's entry in [`PreprocessingPipeline::get_stats`]
    pub id: SignalId,
    pub samples: Vec<f64>,
}

/// Denoising and normalization pipeline with quality bookkeeping
pub struct PreprocessingPipeline {
    config: PreprocessingConfig,
    noise_estimator: NoiseEstimator,
    denoiser: WaveletDenoiser,
    normalizer: SignalNormalizer,
    stats: QualityRecorder,
    next_id: AtomicU64,
}

impl std::fmt::Debug for PreprocessingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreprocessingPipeline")
            .field("config", &self.config)
            .field("recorded", &self.stats.len())
            .finish()
    }
}

impl PreprocessingPipeline {
    /// Validate `config` and build a pipeline on the built-in transform
    pub fn new(config: PreprocessingConfig) -> PreprocessResult<Self> {
        Self::with_transform(config, Arc::new(PeriodicDwt::new()))
    }

    /// Validate `config` against `transform`'s catalog and build a pipeline on it
    pub fn with_transform(
        config: PreprocessingConfig,
        transform: Arc<dyn WaveletTransform>,
    ) -> PreprocessResult<Self> {
        validate_preprocessing_config(&config, transform.as_ref())?;

        debug!(
            wavelet = %config.wavelet_name,
            level = config.decomposition_level,
            method = %config.normalization_method,
            use_parallel = config.use_parallel,
            n_workers = config.n_workers,
            "constructed preprocessing pipeline"
        );

        Ok(Self {
            config,
            noise_estimator: NoiseEstimator::new(),
            denoiser: WaveletDenoiser::new(transform),
            normalizer: SignalNormalizer::new(),
            stats: QualityRecorder::new(),
            next_id: AtomicU64::new(0),
        })
    }

    /// The validated configuration; read-only for the pipeline's lifetime
    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    /// Run one signal through the full pipeline
    pub fn process_one(&self, signal: &[f64]) -> PreprocessResult<ProcessedSignal> {
        let id = SignalId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.process_with_id(id, signal)
    }

    /// Run every signal through the pipeline, preserving input order.
    ///
    /// The first failing signal aborts the whole batch. Results already
    /// recorded for other signals of the batch stay in the stats table.
    pub fn process_batch<S>(&self, signals: &[S]) -> PreprocessResult<Vec<ProcessedSignal>>
    where
        S: AsRef<[f64]> + Sync,
    {
        let count = signals.len() as u64;
        let base = self.next_id.fetch_add(count, Ordering::SeqCst);

        if self.config.use_parallel && signals.len() > 1 {
            self.process_parallel(base, signals)
        } else {
            signals
                .iter()
                .enumerate()
                .map(|(index, signal)| {
                    self.process_with_id(SignalId(base + index as u64), signal.as_ref())
                })
                .collect()
        }
    }

    /// Snapshot of the accumulated quality statistics
    pub fn get_stats(&self) -> BTreeMap<SignalId, QualityStats> {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.clear();
    }

    /// Aggregate over the accumulated statistics
    pub fn summary(&self) -> QualitySummary {
        self.stats.summarize(self.config.snr_threshold)
    }

    fn process_parallel<S>(&self, base: u64, signals: &[S]) -> PreprocessResult<Vec<ProcessedSignal>>
    where
        S: AsRef<[f64]> + Sync,
    {
        let workers = self.config.n_workers.min(signals.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("{}-{}", WORKER_THREAD_PREFIX, i))
            .build()
            .map_err(|e| {
                let err = PreprocessError::config(
                    "n_workers",
                    format!("failed to start {} workers: {}", workers, e),
                );
                error!(error = %err, "worker pool creation failed");
                err
            })?;

        debug!(signals = signals.len(), workers, "dispatching batch");

        let tagged: Vec<(usize, ProcessedSignal)> = pool.install(|| {
            signals
                .par_iter()
                .enumerate()
                .map(|(index, signal)| {
                    self.process_with_id(SignalId(base + index as u64), signal.as_ref())
                        .map(|processed| (index, processed))
                })
                .collect::<PreprocessResult<Vec<_>>>()
        })?;

        let mut ordered: Vec<Option<ProcessedSignal>> = vec![None; signals.len()];
        for (index, processed) in tagged {
            ordered[index] = Some(processed);
        }
        Ok(ordered.into_iter().flatten().collect())
    }

    fn process_with_id(&self, id: SignalId, signal: &[f64]) -> PreprocessResult<ProcessedSignal> {
        #[cfg(feature = "performance_monitoring")]
        let started = std::time::Instant::now();

        let assessment = self.noise_estimator.assess(signal).map_err(|e| {
            error!(signal_id = %id, error = %e, "noise assessment failed");
            e
        })?;

        if assessment.snr_db < self.config.snr_threshold {
            warn!(
                signal_id = %id,
                snr_db = assessment.snr_db,
                threshold_db = self.config.snr_threshold,
                "SNR below threshold, processing anyway"
            );
        }

        let denoised = self
            .denoiser
            .denoise_with_noise(
                signal,
                &self.config.wavelet_name,
                self.config.decomposition_level,
                assessment.noise_level,
            )
            .map_err(|e| {
                error!(signal_id = %id, error = %e, "denoising failed");
                e
            })?;

        let samples = self
            .normalizer
            .normalize(&denoised, self.config.normalization_method);

        self.stats.record(
            id,
            QualityStats {
                snr_db: assessment.snr_db,
                noise_level: assessment.noise_level,
                original_length: signal.len(),
                processed_length: samples.len(),
            },
        );

        #[cfg(feature = "performance_monitoring")]
        debug!(signal_id = %id, elapsed_us = started.elapsed().as_micros() as u64, "processed signal");

        Ok(ProcessedSignal { id, samples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizationMethod;
    use crate::simulation::SignalGenerator;

    fn config(use_parallel: bool) -> PreprocessingConfig {
        PreprocessingConfig {
            snr_threshold: 10.0,
            wavelet_name: "db4".to_string(),
            decomposition_level: 3,
            normalization_method: NormalizationMethod::Standard,
            use_parallel,
            n_workers: 3,
            batch_size: 8,
        }
    }

    #[test]
    fn test_construction_rejects_invalid_config() {
        let mut bad = config(false);
        bad.decomposition_level = 0;
        assert!(PreprocessingPipeline::new(bad).unwrap_err().is_config());

        let mut bad = config(false);
        bad.wavelet_name = "unknown".to_string();
        assert!(PreprocessingPipeline::new(bad).unwrap_err().is_config());

        let mut bad = config(false);
        bad.snr_threshold = -1.0;
        assert!(PreprocessingPipeline::new(bad).unwrap_err().is_config());
    }

    #[test]
    fn test_process_one_records_stats() {
        let pipeline = PreprocessingPipeline::new(config(false)).unwrap();
        let mut generator = SignalGenerator::with_seed(4);
        let signal = generator.sine_burst_with_noise(256, 5.0, 0.05, 1.0);

        let processed = pipeline.process_one(&signal).unwrap();
        assert_eq!(processed.samples.len(), 256);

        let stats = pipeline.get_stats();
        assert_eq!(stats.len(), 1);
        let entry = stats[&processed.id];
        assert_eq!(entry.original_length, 256);
        assert_eq!(entry.processed_length, 256);
        assert!(entry.noise_level > 0.0);
    }

    #[test]
    fn test_ids_are_sequential() {
        let pipeline = PreprocessingPipeline::new(config(false)).unwrap();
        let mut generator = SignalGenerator::with_seed(8);

        let first = pipeline.process_one(&generator.gaussian_noise(128, 1.0)).unwrap();
        let batch = pipeline.process_batch(&generator.burst_batch(3, 128, 1.0)).unwrap();
        let last = pipeline.process_one(&generator.gaussian_noise(128, 1.0)).unwrap();

        assert_eq!(first.id, SignalId(0));
        let batch_ids: Vec<SignalId> = batch.iter().map(|p| p.id).collect();
        assert_eq!(batch_ids, vec![SignalId(1), SignalId(2), SignalId(3)]);
        assert_eq!(last.id, SignalId(4));
    }

    #[test]
    fn test_low_snr_is_not_an_error() {
        let mut cfg = config(false);
        cfg.snr_threshold = 100.0;
        let pipeline = PreprocessingPipeline::new(cfg).unwrap();
        let mut generator = SignalGenerator::with_seed(6);

        let processed = pipeline.process_one(&generator.gaussian_noise(256, 1.0)).unwrap();
        assert_eq!(processed.samples.len(), 256);
        assert_eq!(pipeline.summary().low_snr_signals, 1);
    }

    #[test]
    fn test_extreme_magnitudes_are_gated_and_recorded() {
        let cfg = PreprocessingConfig {
            wavelet_name: "haar".to_string(),
            decomposition_level: 1,
            ..config(false)
        };
        let pipeline = PreprocessingPipeline::new(cfg).unwrap();

        let huge = pipeline.process_one(&[1e300, -1e300, 5.0, 1e300]).unwrap();
        let tiny = pipeline.process_one(&[1e-300, -1e-300, 3e-300, 0.0]).unwrap();

        assert!(huge.samples.iter().all(|x| x.is_finite()));
        assert!(huge.samples.iter().any(|&x| x != 0.0), "huge signal collapsed to zeros");

        let stats = pipeline.get_stats();
        for id in [huge.id, tiny.id] {
            let entry = stats[&id];
            assert!(entry.snr_db.is_finite(), "{} snr {}", id, entry.snr_db);
            assert!(entry.noise_level.is_finite() && entry.noise_level > 0.0);
        }

        // Both sit a few dB above zero, well under the 10 dB gate
        assert_eq!(pipeline.summary().low_snr_signals, 2);
    }

    #[test]
    fn test_reset_stats() {
        let pipeline = PreprocessingPipeline::new(config(false)).unwrap();
        let mut generator = SignalGenerator::with_seed(10);
        pipeline.process_batch(&generator.burst_batch(4, 128, 1.0)).unwrap();
        assert_eq!(pipeline.get_stats().len(), 4);

        pipeline.reset_stats();
        assert!(pipeline.get_stats().is_empty());
        assert_eq!(pipeline.summary().signals, 0);
    }

    #[test]
    fn test_batch_failure_aborts() {
        let pipeline = PreprocessingPipeline::new(config(true)).unwrap();
        let mut generator = SignalGenerator::with_seed(12);
        let mut batch = generator.burst_batch(4, 256, 1.0);
        batch[2] = vec![1.0; 8];

        let err = pipeline.process_batch(&batch).unwrap_err();
        assert!(err.is_denoising());
    }

    #[test]
    fn test_empty_batch() {
        let pipeline = PreprocessingPipeline::new(config(true)).unwrap();
        let empty: Vec<Vec<f64>> = Vec::new();
        assert!(pipeline.process_batch(&empty).unwrap().is_empty());
    }
}
