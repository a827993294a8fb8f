// src/processing/wavelet/transform.rs
//! Periodized orthogonal discrete wavelet transform

use super::catalog::{self, WaveletFilter, WAVELET_NAMES};
use super::{Decomposition, TransformError, WaveletTransform};

/// Multi-level DWT with periodic boundary handling.
///
/// Before analysis the signal is extended symmetrically at its right edge to a
/// multiple of `2^levels`, so every level halves an even-length sequence and
/// reconstruction is exact up to floating-point rounding. The reconstruction
/// therefore has the padded length.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodicDwt;

impl PeriodicDwt {
    pub fn new() -> Self {
        Self
    }

    /// Deepest useful level for a signal of `length` samples:
    /// `floor(log2(length / (filter_len - 1)))`.
    pub fn max_level(length: usize, filter_len: usize) -> usize {
        if filter_len < 2 {
            return 0;
        }
        let support = filter_len - 1;
        let mut level = 0;
        while support << (level + 1) <= length {
            level += 1;
        }
        level
    }

    fn filter(name: &str) -> Result<&'static WaveletFilter, TransformError> {
        catalog::lookup(name).ok_or_else(|| TransformError::UnknownWavelet(name.to_string()))
    }

    fn pad_signal(signal: &[f64], levels: usize) -> Vec<f64> {
        let n = signal.len();
        let divisor = 1usize << levels;
        let target = n.div_ceil(divisor) * divisor;

        let mut padded = Vec::with_capacity(target);
        padded.extend_from_slice(signal);
        for idx in 0..(target - n) {
            padded.push(signal[n - 1 - idx % n]);
        }
        padded
    }

    /// One analysis level: circular convolution with both filters, keep every
    /// second output.
    fn analysis_step(signal: &[f64], low: &[f64], high: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let n = signal.len();
        let half = n / 2;

        let mut approximation = Vec::with_capacity(half);
        let mut details = Vec::with_capacity(half);

        for k in 0..half {
            let mut low_sum = 0.0;
            let mut high_sum = 0.0;

            for (j, (&low_coeff, &high_coeff)) in low.iter().zip(high.iter()).enumerate() {
                let idx = (2 * k + j) % n;
                low_sum += signal[idx] * low_coeff;
                high_sum += signal[idx] * high_coeff;
            }

            approximation.push(low_sum);
            details.push(high_sum);
        }

        (approximation, details)
    }

    /// Transpose of [`Self::analysis_step`]; for orthogonal filters this is its inverse.
    fn synthesis_step(approximation: &[f64], details: &[f64], low: &[f64], high: &[f64]) -> Vec<f64> {
        let half = approximation.len();
        let n = half * 2;
        let mut output = vec![0.0; n];

        for k in 0..half {
            for (j, (&low_coeff, &high_coeff)) in low.iter().zip(high.iter()).enumerate() {
                let idx = (2 * k + j) % n;
                output[idx] += low_coeff * approximation[k] + high_coeff * details[k];
            }
        }

        output
    }
}

impl WaveletTransform for PeriodicDwt {
    fn is_known_wavelet(&self, name: &str) -> bool {
        catalog::lookup(name).is_some()
    }

    fn wavelet_names(&self) -> Vec<&str> {
        WAVELET_NAMES.to_vec()
    }

    fn decompose(
        &self,
        signal: &[f64],
        wavelet: &str,
        levels: usize,
    ) -> Result<Decomposition, TransformError> {
        let filter = Self::filter(wavelet)?;
        if signal.is_empty() {
            return Err(TransformError::EmptySignal);
        }

        let max_level = Self::max_level(signal.len(), filter.len());
        if levels > max_level {
            return Err(TransformError::LevelTooHigh {
                requested: levels,
                max_level,
                length: signal.len(),
            });
        }

        let high = filter.high_pass();
        let mut current = Self::pad_signal(signal, levels);
        let mut details = Vec::with_capacity(levels);

        for _ in 0..levels {
            let (approximation, detail) = Self::analysis_step(&current, filter.low_pass, &high);
            details.push(detail);
            current = approximation;
        }

        Ok(Decomposition {
            approximation: current,
            details,
        })
    }

    fn reconstruct(
        &self,
        decomposition: &Decomposition,
        wavelet: &str,
    ) -> Result<Vec<f64>, TransformError> {
        let filter = Self::filter(wavelet)?;
        let high = filter.high_pass();
        let mut current = decomposition.approximation.clone();

        for (index, detail) in decomposition.details.iter().enumerate().rev() {
            if detail.len() != current.len() {
                return Err(TransformError::CoefficientMismatch {
                    level: index + 1,
                    approximation: current.len(),
                    detail: detail.len(),
                });
            }
            current = Self::synthesis_step(&current, detail, filter.low_pass, &high);
        }

        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn test_signal(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                (2.0 * PI * 5.0 * t).sin() + 0.3 * (2.0 * PI * 40.0 * t).cos() + 0.1 * t
            })
            .collect()
    }

    #[test]
    fn test_max_level() {
        // pywt.dwt_max_level(1024, 8) == 7, (1024, 2) == 10
        assert_eq!(PeriodicDwt::max_level(1024, 8), 7);
        assert_eq!(PeriodicDwt::max_level(1024, 2), 10);
        assert_eq!(PeriodicDwt::max_level(100, 4), 5);
        assert_eq!(PeriodicDwt::max_level(5, 8), 0);
        assert_eq!(PeriodicDwt::max_level(1024, 1), 0);
    }

    #[test]
    fn test_haar_single_level() {
        let dwt = PeriodicDwt::new();
        let decomposition = dwt.decompose(&[1.0, 1.0, 2.0, 4.0], "haar", 1).unwrap();

        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((decomposition.approximation[0] - 2.0 * s).abs() < 1e-12);
        assert!((decomposition.approximation[1] - 6.0 * s).abs() < 1e-12);
        assert!(decomposition.details[0][0].abs() < 1e-12);
        assert!((decomposition.details[0][1].abs() - 2.0 * s).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_reconstruction() {
        let dwt = PeriodicDwt::new();
        let signal = test_signal(512);

        for name in WAVELET_NAMES {
            let filter = catalog::lookup(name).unwrap();
            let levels = PeriodicDwt::max_level(signal.len(), filter.len()).min(5);
            let decomposition = dwt.decompose(&signal, name, levels).unwrap();
            let rebuilt = dwt.reconstruct(&decomposition, name).unwrap();

            assert_eq!(rebuilt.len(), signal.len());
            for (a, b) in signal.iter().zip(rebuilt.iter()) {
                assert!((a - b).abs() < 1e-9, "{} reconstruction error {}", name, (a - b).abs());
            }
        }
    }

    #[test]
    fn test_odd_length_is_padded() {
        let dwt = PeriodicDwt::new();
        let signal = test_signal(1001);
        let decomposition = dwt.decompose(&signal, "db2", 3).unwrap();

        // 1001 -> 1008 after extension to a multiple of 8
        assert_eq!(decomposition.details[0].len(), 504);
        assert_eq!(decomposition.details[1].len(), 252);
        assert_eq!(decomposition.details[2].len(), 126);
        assert_eq!(decomposition.approximation.len(), 126);

        let rebuilt = dwt.reconstruct(&decomposition, "db2").unwrap();
        assert_eq!(rebuilt.len(), 1008);
        for (a, b) in signal.iter().zip(rebuilt.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_energy_is_preserved() {
        let dwt = PeriodicDwt::new();
        let signal = test_signal(256);
        let decomposition = dwt.decompose(&signal, "db4", 3).unwrap();

        let signal_energy: f64 = signal.iter().map(|x| x * x).sum();
        let coeff_energy: f64 = decomposition.approximation.iter().map(|x| x * x).sum::<f64>()
            + decomposition
                .details
                .iter()
                .flat_map(|d| d.iter())
                .map(|x| x * x)
                .sum::<f64>();

        assert!((signal_energy - coeff_energy).abs() < 1e-8 * signal_energy);
    }

    #[test]
    fn test_decompose_errors() {
        let dwt = PeriodicDwt::new();

        assert_eq!(
            dwt.decompose(&[1.0; 64], "morlet", 1),
            Err(TransformError::UnknownWavelet("morlet".to_string()))
        );
        assert_eq!(dwt.decompose(&[], "haar", 1), Err(TransformError::EmptySignal));
        assert_eq!(
            dwt.decompose(&[1.0; 16], "db4", 2),
            Err(TransformError::LevelTooHigh { requested: 2, max_level: 1, length: 16 })
        );
    }

    #[test]
    fn test_reconstruct_rejects_mismatched_coefficients() {
        let dwt = PeriodicDwt::new();
        let decomposition = Decomposition {
            approximation: vec![0.0; 4],
            details: vec![vec![0.0; 8], vec![0.0; 3]],
        };

        assert!(matches!(
            dwt.reconstruct(&decomposition, "haar"),
            Err(TransformError::CoefficientMismatch { level: 2, .. })
        ));
    }

    #[test]
    fn test_catalog_queries() {
        let dwt = PeriodicDwt::new();
        assert!(dwt.is_known_wavelet("db4"));
        assert!(dwt.is_known_wavelet("sym4"));
        assert!(!dwt.is_known_wavelet("mexh"));
        assert_eq!(dwt.wavelet_names().len(), WAVELET_NAMES.len());
    }
}
