use num_complex::Complex32;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::f32::consts::{FRAC_1_SQRT_2, PI};

/// Unit-variance circular complex Gaussian noise
pub fn seeded_gaussian(num_samples: usize, seed: u64) -> Vec<Complex32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0f32, FRAC_1_SQRT_2).unwrap();
    (0..num_samples)
        .map(|_| Complex32::new(normal.sample(&mut rng), normal.sample(&mut rng)))
        .collect()
}

/// Complex exponential at `freq_hz` (negative frequencies allowed)
pub fn complex_tone(
    freq_hz: f32,
    sample_rate: f32,
    num_samples: usize,
    amplitude: f32,
) -> Vec<Complex32> {
    (0..num_samples)
        .map(|i| {
            // Wrap in f64 so long tones keep a clean phase
            let cycles = (freq_hz as f64 * i as f64 / sample_rate as f64).fract();
            Complex32::from_polar(amplitude, 2.0 * PI * cycles as f32)
        })
        .collect()
}

/// Unit impulse at `position`
pub fn impulse(num_samples: usize, position: usize) -> Vec<Complex32> {
    let mut samples = vec![Complex32::new(0.0, 0.0); num_samples];
    if position < num_samples {
        samples[position] = Complex32::new(1.0, 0.0);
    }
    samples
}
