//! Welch power spectral density estimation for complex sequences.
//!
//! Frequencies run from -fs/2 to fs/2 (FFT-shifted), and power is scaled as
//! a density so that `sum(power) * bin_width` equals the mean signal power.

use crate::constants::MIN_POWER_THRESHOLD;
use crate::error::{FilterError, Result};
use crate::signal_processing::window::Window;
use num_complex::{Complex32, Complex64};
use rustfft::FftPlanner;

#[derive(Debug, Clone, serde::Serialize)]
pub struct Psd {
    pub frequencies: Vec<f64>,
    pub power: Vec<f64>,
}

impl Psd {
    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    pub fn bin_width(&self) -> f64 {
        if self.frequencies.len() < 2 {
            return 0.0;
        }
        self.frequencies[1] - self.frequencies[0]
    }

    /// Power in dB per bin
    pub fn to_db(&self) -> Vec<f64> {
        self.power.iter().map(|&p| power_to_db(p)).collect()
    }

    /// Mean density over bins with `low_hz <= |f| <= high_hz`
    ///
    /// Returns `None` if no bin falls in the range.
    pub fn mean_power(&self, low_hz: f64, high_hz: f64) -> Option<f64> {
        let (sum, count) = self
            .frequencies
            .iter()
            .zip(&self.power)
            .filter(|(f, _)| (low_hz..=high_hz).contains(&f.abs()))
            .fold((0.0, 0usize), |(s, c), (_, &p)| (s + p, c + 1));
        (count > 0).then(|| sum / count as f64)
    }

    /// Frequency of the strongest bin
    pub fn peak_frequency(&self) -> Option<f64> {
        self.power
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| self.frequencies[i])
    }

    /// Total power (integral of the density)
    pub fn total_power(&self) -> f64 {
        self.power.iter().sum::<f64>() * self.bin_width()
    }
}

pub fn power_to_db(power: f64) -> f64 {
    10.0 * power.max(MIN_POWER_THRESHOLD).log10()
}

/// Estimate the PSD with Welch's method
///
/// Segments of `nfft` samples share `overlap` samples with their
/// predecessor. Input shorter than `nfft` is zero-padded into one segment.
///
/// # Errors
/// Returns `FilterError::Config` if `nfft` is zero, `overlap >= nfft`, or the
/// sample rate is not positive.
pub fn welch_psd(
    samples: &[Complex32],
    sample_rate: f64,
    nfft: usize,
    overlap: usize,
    window: Window,
) -> Result<Psd> {
    if nfft == 0 {
        return Err(FilterError::Config("nfft must be positive".to_string()));
    }
    if overlap >= nfft {
        return Err(FilterError::Config(format!(
            "overlap {} must be smaller than nfft {}",
            overlap, nfft
        )));
    }
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(FilterError::Config(format!(
            "sample rate must be positive, got {}",
            sample_rate
        )));
    }

    let win = window.coefficients(nfft);
    let win_energy: f64 = win.iter().map(|w| w * w).sum();
    let step = nfft - overlap;

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nfft);

    let mut accum = vec![0.0f64; nfft];
    let mut buffer = vec![Complex64::new(0.0, 0.0); nfft];
    let mut segments = 0usize;
    let mut start = 0usize;

    loop {
        buffer.fill(Complex64::new(0.0, 0.0));
        let end = (start + nfft).min(samples.len());
        for (i, s) in samples[start..end].iter().enumerate() {
            buffer[i] = Complex64::new(s.re as f64, s.im as f64) * win[i];
        }
        fft.process(&mut buffer);
        for (acc, x) in accum.iter_mut().zip(&buffer) {
            *acc += x.norm_sqr();
        }
        segments += 1;

        start += step;
        if start + nfft > samples.len() {
            break;
        }
    }

    let scale = 1.0 / (sample_rate * win_energy * segments as f64);
    let bin_width = sample_rate / nfft as f64;
    let first = nfft.div_ceil(2);

    let mut frequencies = Vec::with_capacity(nfft);
    let mut power = Vec::with_capacity(nfft);
    for k in 0..nfft {
        let j = (k + first) % nfft;
        let signed = if j < first {
            j as f64
        } else {
            j as f64 - nfft as f64
        };
        frequencies.push(signed * bin_width);
        power.push(accum[j] * scale);
    }

    log::debug!(
        "Welch PSD: {} samples, nfft={}, overlap={}, {} segments",
        samples.len(),
        nfft,
        overlap,
        segments
    );

    Ok(Psd { frequencies, power })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn tone(freq: f64, sample_rate: f64, len: usize) -> Vec<Complex32> {
        (0..len)
            .map(|i| {
                let phase = 2.0 * PI * freq * i as f64 / sample_rate;
                Complex32::new(phase.cos() as f32, phase.sin() as f32)
            })
            .collect()
    }

    #[test]
    fn test_frequency_axis_is_centered() {
        let psd = welch_psd(&tone(0.0, 8000.0, 64), 8000.0, 8, 0, Window::Hann).unwrap();
        assert_eq!(
            psd.frequencies,
            vec![-4000.0, -3000.0, -2000.0, -1000.0, 0.0, 1000.0, 2000.0, 3000.0]
        );

        let odd = welch_psd(&tone(0.0, 5.0, 10), 5.0, 5, 0, Window::Hann).unwrap();
        assert_eq!(odd.frequencies, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_tone_peak_and_total_power() {
        let psd = welch_psd(
            &tone(1000.0, 8000.0, 4096),
            8000.0,
            256,
            64,
            Window::Rectangular,
        )
        .unwrap();
        assert_eq!(psd.len(), 256);
        assert_relative_eq!(psd.peak_frequency().unwrap(), 1000.0);
        assert_relative_eq!(psd.total_power(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_frequency_tone() {
        let psd = welch_psd(
            &tone(-500.0, 8000.0, 2048),
            8000.0,
            512,
            128,
            Window::BlackmanHarris,
        )
        .unwrap();
        assert_relative_eq!(psd.peak_frequency().unwrap(), -500.0);
    }

    #[test]
    fn test_short_input_is_zero_padded() {
        let psd = welch_psd(&tone(0.0, 1000.0, 10), 1000.0, 64, 16, Window::Hann).unwrap();
        assert_eq!(psd.len(), 64);
        assert_eq!(psd.peak_frequency(), Some(0.0));

        let empty = welch_psd(&[], 1000.0, 16, 4, Window::Hann).unwrap();
        assert!(empty.power.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_mean_power_uses_absolute_frequency() {
        let psd = Psd {
            frequencies: vec![-2.0, -1.0, 0.0, 1.0, 2.0],
            power: vec![4.0, 2.0, 1.0, 2.0, 4.0],
        };
        assert_eq!(psd.mean_power(0.5, 1.5), Some(2.0));
        assert_eq!(psd.mean_power(1.5, 10.0), Some(4.0));
        assert_eq!(psd.mean_power(5.0, 10.0), None);
    }

    #[test]
    fn test_invalid_parameters() {
        let x = tone(0.0, 8000.0, 64);
        assert!(welch_psd(&x, 8000.0, 0, 0, Window::Hann).is_err());
        assert!(welch_psd(&x, 8000.0, 16, 16, Window::Hann).is_err());
        assert!(welch_psd(&x, 0.0, 16, 4, Window::Hann).is_err());
    }

    #[test]
    fn test_power_to_db_floor() {
        assert_relative_eq!(power_to_db(1.0), 0.0);
        assert_relative_eq!(power_to_db(0.01), -20.0, epsilon = 1e-12);
        assert!(power_to_db(0.0).is_finite());
    }
}
