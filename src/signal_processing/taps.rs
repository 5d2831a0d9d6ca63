use crate::constants::MIN_POWER_THRESHOLD;
use crate::error::{FilterError, Result};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Immutable FIR tap coefficients
///
/// Produced once by the designer and handed to a `FirDecimator`, which owns
/// it for its whole lifetime. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TapSequence {
    taps: Vec<f64>,
}

impl TapSequence {
    /// Wrap a coefficient vector
    ///
    /// # Errors
    /// Returns `FilterError::InvalidFilter` if `taps` is empty or contains
    /// non-finite values.
    pub fn new(taps: Vec<f64>) -> Result<Self> {
        if taps.is_empty() {
            return Err(FilterError::InvalidFilter(
                "tap sequence is empty".to_string(),
            ));
        }
        if let Some(i) = taps.iter().position(|t| !t.is_finite()) {
            return Err(FilterError::InvalidFilter(format!(
                "tap {} is not finite: {}",
                i, taps[i]
            )));
        }
        Ok(Self { taps })
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Sum of the coefficients, i.e. the filter gain at 0 Hz
    pub fn dc_gain(&self) -> f64 {
        self.taps.iter().sum()
    }

    /// Get the group delay in samples (half the filter length for linear phase)
    pub fn group_delay_samples(&self) -> usize {
        (self.taps.len() - 1) / 2
    }

    /// True if the taps are even-symmetric (linear phase) within `tolerance`
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.taps.len();
        (0..n / 2).all(|i| (self.taps[i] - self.taps[n - 1 - i]).abs() <= tolerance)
    }

    /// Complex frequency response H(f) evaluated at `freq_hz`
    pub fn frequency_response(&self, freq_hz: f64, sample_rate: f64) -> Complex64 {
        let omega = 2.0 * PI * freq_hz / sample_rate;
        self.taps
            .iter()
            .enumerate()
            .map(|(k, &h)| Complex64::from_polar(h, -omega * k as f64))
            .sum()
    }

    /// Magnitude response in dB at `freq_hz`
    pub fn magnitude_db(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        let mag = self.frequency_response(freq_hz, sample_rate).norm();
        20.0 * mag.max(MIN_POWER_THRESHOLD).log10()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.taps
    }
}

impl AsRef<[f64]> for TapSequence {
    fn as_ref(&self) -> &[f64] {
        &self.taps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_taps_rejected() {
        let err = TapSequence::new(Vec::new()).unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilter(_)));
    }

    #[test]
    fn test_non_finite_taps_rejected() {
        assert!(TapSequence::new(vec![0.5, f64::NAN, 0.5]).is_err());
        assert!(TapSequence::new(vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn test_dc_gain_and_response_agree() {
        let taps = TapSequence::new(vec![0.25, 0.5, 0.25]).unwrap();
        assert_relative_eq!(taps.dc_gain(), 1.0);
        let h0 = taps.frequency_response(0.0, 8000.0);
        assert_relative_eq!(h0.re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(h0.im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_half_band_null() {
        // [0.25, 0.5, 0.25] has a zero at Nyquist
        let taps = TapSequence::new(vec![0.25, 0.5, 0.25]).unwrap();
        assert!(taps.frequency_response(4000.0, 8000.0).norm() < 1e-12);
        assert!(taps.magnitude_db(4000.0, 8000.0) < -200.0);
    }

    #[test]
    fn test_group_delay_and_symmetry() {
        let taps = TapSequence::new(vec![0.1, 0.2, 0.4, 0.2, 0.1]).unwrap();
        assert_eq!(taps.group_delay_samples(), 2);
        assert!(taps.is_symmetric(0.0));

        let skewed = TapSequence::new(vec![0.1, 0.2, 0.4]).unwrap();
        assert!(!skewed.is_symmetric(1e-9));
    }
}
