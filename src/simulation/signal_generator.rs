//! Synthetic signals for tests, benchmarks and demos
//! Location: src/simulation/signal_generator.rs

use std::f64::consts::PI;

use super::noise_models::GaussianNoise;

/// Builds sine bursts, pure noise and constant traces from one seeded noise source
pub struct SignalGenerator {
    noise: GaussianNoise,
}

impl SignalGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            noise: GaussianNoise::with_seed(0.0, 1.0, seed),
        }
    }

    /// Zero-mean Gaussian noise with standard deviation `sigma`
    pub fn gaussian_noise(&mut self, length: usize, sigma: f64) -> Vec<f64> {
        (0..length).map(|_| sigma * self.noise.generate_sample()).collect()
    }

    /// Hann-windowed sine burst centred in the trace, zero elsewhere.
    ///
    /// `cycles_per_sample` is the normalized frequency; the burst spans the
    /// middle quarter of the trace.
    pub fn sine_burst(&self, length: usize, amplitude: f64, cycles_per_sample: f64) -> Vec<f64> {
        let width = (length / 4).max(1);
        let start = (length - width.min(length)) / 2;

        (0..length)
            .map(|i| {
                if i < start || i >= start + width {
                    return 0.0;
                }
                let position = (i - start) as f64 / width as f64;
                let envelope = 0.5 * (1.0 - (2.0 * PI * position).cos());
                amplitude * envelope * (2.0 * PI * cycles_per_sample * i as f64).sin()
            })
            .collect()
    }

    /// Sine burst plus zero-mean Gaussian noise of standard deviation `sigma`
    pub fn sine_burst_with_noise(
        &mut self,
        length: usize,
        amplitude: f64,
        cycles_per_sample: f64,
        sigma: f64,
    ) -> Vec<f64> {
        let mut signal = self.sine_burst(length, amplitude, cycles_per_sample);
        for sample in signal.iter_mut() {
            *sample += sigma * self.noise.generate_sample();
        }
        signal
    }

    pub fn constant(&self, length: usize, value: f64) -> Vec<f64> {
        vec![value; length]
    }

    /// A batch of independent noisy bursts with varying amplitude
    pub fn burst_batch(&mut self, count: usize, length: usize, sigma: f64) -> Vec<Vec<f64>> {
        (0..count)
            .map(|k| {
                let amplitude = 2.0 + k as f64;
                self.sine_burst_with_noise(length, amplitude, 0.03, sigma)
            })
            .collect()
    }
}
