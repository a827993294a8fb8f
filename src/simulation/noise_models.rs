//! Noise sources for synthetic test signals
//! Location: src/simulation/noise_models.rs

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// White Gaussian noise from a seeded generator
pub struct GaussianNoise {
    mean: f64,
    std_dev: f64,
    rng: StdRng,
}

impl GaussianNoise {
    /// Reproducible source, identical output for identical seeds
    pub fn with_seed(mean: f64, std_dev: f64, seed: u64) -> Self {
        Self {
            mean,
            std_dev,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the OS
    pub fn from_entropy(mean: f64, std_dev: f64) -> Self {
        Self {
            mean,
            std_dev,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn generate_sample(&mut self) -> f64 {
        self.mean + self.std_dev * self.box_muller_transform()
    }

    pub fn samples(&mut self, count: usize) -> Vec<f64> {
        (0..count).map(|_| self.generate_sample()).collect()
    }

    /// Add noise to every sample of `signal` in place
    pub fn add_to(&mut self, signal: &mut [f64]) {
        for sample in signal.iter_mut() {
            *sample += self.generate_sample();
        }
    }

    fn box_muller_transform(&mut self) -> f64 {
        // gen() is in [0, 1); shift to (0, 1] so ln() stays finite
        let u1 = 1.0 - self.rng.gen::<f64>();
        let u2 = self.rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}
