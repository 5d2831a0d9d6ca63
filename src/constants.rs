//! Numeric constants for filter design and spectrum estimation
//!
//! Defaults mirror the command-line defaults of the demo; the remaining
//! values guard the numerics of the designer and the PSD estimator.

/// Default number of samples taken from the noise source.
pub const DEFAULT_NUM_SAMPLES: usize = 10_000;

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: f64 = 8000.0;

/// Default low-pass bandwidth (cutoff) in Hz.
pub const DEFAULT_BANDWIDTH: f64 = 1000.0;

/// Default transition width in Hz.
pub const DEFAULT_TRANSITION_WIDTH: f64 = 100.0;

/// Default stopband attenuation in dB.
pub const DEFAULT_ATTENUATION_DB: f64 = 80.0;

/// Default FFT size for Welch PSD estimates.
pub const DEFAULT_NFFT: usize = 1024;

/// Smallest filter the designer will emit (odd, Type I linear phase).
pub const MIN_NUM_TAPS: usize = 3;

/// Upper bound on designed filter length. Specifications that would need
/// more taps than this are rejected instead of allocating unbounded memory.
pub const MAX_NUM_TAPS: usize = 1 << 20;

/// Largest stopband attenuation accepted by the designer. Deeper stopbands
/// are below the double-precision floor of the computed response.
pub const MAX_ATTENUATION_DB: f64 = 200.0;

/// Extra depth the designer requires beyond the requested attenuation, so
/// that peaks falling between measurement points still meet the request.
pub const STOPBAND_MARGIN_DB: f64 = 0.05;

/// Upper bound on length corrections after the initial tap estimate.
pub const MAX_DESIGN_ITERATIONS: usize = 64;

/// Equiripple passband ripple budget in dB, used to weight the stopband.
pub const EQUIRIPPLE_PASSBAND_RIPPLE_DB: f64 = 0.1;

/// Convergence threshold for the Bessel I0 power series.
pub const BESSEL_EPSILON: f64 = 1e-21;

/// Term limit for the Bessel I0 power series.
pub const BESSEL_MAX_TERMS: usize = 1000;

/// Floor applied before converting power to dB so silent bins stay finite.
pub const MIN_POWER_THRESHOLD: f64 = 1e-30;
