use crate::error::{FilterError, Result};
use num_complex::Complex32;
use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::f32::consts::FRAC_1_SQRT_2;

/// Sample distribution of the noise source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseType {
    /// Circular complex Gaussian
    #[default]
    Gaussian,
    /// I and Q independently uniform in [-amplitude, amplitude)
    Uniform,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Endless complex noise generator
///
/// For `Gaussian`, I and Q each have variance `amplitude² / 2` so the complex
/// variance is `amplitude²`. Truncate with `take(n)` or `head(n)`.
pub struct NoiseSource {
    noise_type: NoiseType,
    amplitude: f32,
    normal: Normal<f32>,
    rng: ChaCha8Rng,
}

impl NoiseSource {
    /// # Errors
    /// Returns `FilterError::Config` if `amplitude` is negative or not finite.
    pub fn new(noise_type: NoiseType, amplitude: f32, seed: Option<u64>) -> Result<Self> {
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(FilterError::Config(format!(
                "noise amplitude must be non-negative and finite, got {}",
                amplitude
            )));
        }
        let normal = Normal::new(0.0, amplitude * FRAC_1_SQRT_2)
            .map_err(|e| FilterError::Config(format!("noise distribution: {}", e)))?;
        Ok(Self {
            noise_type,
            amplitude,
            normal,
            rng: create_rng(seed),
        })
    }

    pub fn noise_type(&self) -> NoiseType {
        self.noise_type
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Take the next `n` samples
    pub fn head(&mut self, n: usize) -> Vec<Complex32> {
        self.take(n).collect()
    }
}

impl Iterator for NoiseSource {
    type Item = Complex32;

    fn next(&mut self) -> Option<Complex32> {
        let sample = match self.noise_type {
            NoiseType::Gaussian => Complex32::new(
                self.normal.sample(&mut self.rng),
                self.normal.sample(&mut self.rng),
            ),
            NoiseType::Uniform => {
                let re = self.rng.random::<f32>() * 2.0 - 1.0;
                let im = self.rng.random::<f32>() * 2.0 - 1.0;
                Complex32::new(re, im) * self.amplitude
            }
        };
        Some(sample)
    }
}

/// Mean of |x|² over the sequence
pub fn signal_power(signal: &[Complex32]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|x| x.norm_sqr() as f64).sum::<f64>() / signal.len() as f64
}
