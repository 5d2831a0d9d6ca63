//! Window functions for FIR design and spectral estimation.

use crate::constants::{BESSEL_EPSILON, BESSEL_MAX_TERMS};
use std::f64::consts::PI;

/// Window applied to each Welch segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Window {
    Rectangular,
    Hann,
    /// 4-term Blackman-Harris, ~92 dB sidelobes
    #[default]
    BlackmanHarris,
}

impl Window {
    pub fn coefficients(self, len: usize) -> Vec<f64> {
        match self {
            Window::Rectangular => vec![1.0; len],
            Window::Hann => hann(len),
            Window::BlackmanHarris => blackman_harris(len),
        }
    }
}

/// Zeroth-order modified Bessel function of the first kind
///
/// Returns `f64::INFINITY` once the series overflows (|x| above about 713).
pub fn bessel_i0(x: f64) -> f64 {
    let half_x = x / 2.0;
    let mut sum = 1.0;
    let mut term = 1.0;
    for k in 1..=BESSEL_MAX_TERMS {
        let ratio = half_x / k as f64;
        term *= ratio * ratio;
        sum += term;
        if !sum.is_finite() || term < BESSEL_EPSILON * sum {
            break;
        }
    }
    sum
}

/// Kaiser beta for a given stopband attenuation in dB
pub fn kaiser_beta(attenuation_db: f64) -> f64 {
    if attenuation_db > 50.0 {
        0.1102 * (attenuation_db - 8.7)
    } else if attenuation_db >= 21.0 {
        0.5842 * (attenuation_db - 21.0).powf(0.4) + 0.07886 * (attenuation_db - 21.0)
    } else {
        0.0
    }
}

/// Kaiser window of `len` points with shape parameter `beta`
pub fn kaiser(len: usize, beta: f64) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    let denom = bessel_i0(beta);
    let m = (len - 1) as f64;
    (0..len)
        .map(|n| {
            let r = 2.0 * n as f64 / m - 1.0;
            bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / denom
        })
        .collect()
}

/// Periodic Hann window (suited to spectral estimation)
pub fn hann(len: usize) -> Vec<f64> {
    (0..len)
        .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f64 / len as f64).cos())
        .collect()
}

/// Periodic 4-term Blackman-Harris window
pub fn blackman_harris(len: usize) -> Vec<f64> {
    const A: [f64; 4] = [0.35875, 0.48829, 0.14128, 0.01168];
    (0..len)
        .map(|n| {
            let x = 2.0 * PI * n as f64 / len as f64;
            A[0] - A[1] * x.cos() + A[2] * (2.0 * x).cos() - A[3] * (3.0 * x).cos()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bessel_i0_known_values() {
        assert_relative_eq!(bessel_i0(0.0), 1.0);
        assert_relative_eq!(bessel_i0(1.0), 1.2660658777520082, epsilon = 1e-12);
        assert_relative_eq!(bessel_i0(5.0), 27.239871823604442, epsilon = 1e-9);
    }

    #[test]
    fn test_bessel_i0_overflow_terminates() {
        // I0(x) ~ e^x / sqrt(2 pi x), so 700 is still finite and 800 is not
        let large = bessel_i0(700.0);
        assert!(large.is_finite());
        assert_relative_eq!(
            large.ln(),
            700.0 - 0.5 * (2.0 * std::f64::consts::PI * 700.0).ln(),
            epsilon = 1e-3
        );
        assert!(bessel_i0(800.0).is_infinite());
        assert!(bessel_i0(1e6).is_infinite());
    }

    #[test]
    fn test_kaiser_beta_regions() {
        assert_eq!(kaiser_beta(10.0), 0.0);
        assert_relative_eq!(kaiser_beta(80.0), 0.1102 * 71.3, epsilon = 1e-12);
        let mid = kaiser_beta(40.0);
        assert!(mid > 0.0 && mid < kaiser_beta(60.0));
    }

    #[test]
    fn test_kaiser_window_shape() {
        let w = kaiser(21, 8.0);
        assert_eq!(w.len(), 21);
        assert_relative_eq!(w[10], 1.0, epsilon = 1e-12);
        for i in 0..10 {
            assert_relative_eq!(w[i], w[20 - i], epsilon = 1e-12);
            assert!(w[i] < w[i + 1]);
        }
        assert_eq!(kaiser(1, 8.0), vec![1.0]);
    }

    #[test]
    fn test_kaiser_zero_beta_is_rectangular() {
        for v in kaiser(9, 0.0) {
            assert_relative_eq!(v, 1.0);
        }
    }

    #[test]
    fn test_spectral_windows_start_near_zero() {
        let h = hann(16);
        assert_relative_eq!(h[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(h[8], 1.0, epsilon = 1e-12);

        let bh = blackman_harris(16);
        assert!(bh[0] < 1e-4);
        assert_relative_eq!(bh[8], 1.0, epsilon = 1e-12);
    }
}
