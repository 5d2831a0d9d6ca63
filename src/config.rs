//! Configuration for the tapline filter demo.
//!
//! Values come from `DemoConfig::default()`, optionally overlaid by a TOML
//! file, and finally by command-line flags in the binaries. Any section or
//! key may be omitted from the file:
//!
//! ```toml
//! num_samples = 20000
//! sample_rate = 48000.0
//! bandwidth = 5000.0
//! decimation = 4
//!
//! [noise]
//! seed = 1234
//!
//! [spectrum]
//! nfft = 2048
//! ```

use crate::constants::{
    DEFAULT_ATTENUATION_DB, DEFAULT_BANDWIDTH, DEFAULT_NFFT, DEFAULT_NUM_SAMPLES,
    DEFAULT_SAMPLE_RATE, DEFAULT_TRANSITION_WIDTH,
};
use crate::error::{FilterError, Result};
use crate::signal_processing::{DesignMethod, FilterSpec, Window};
use crate::simulation::NoiseType;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const ENG_SUFFIXES: [(&str, f64); 11] = [
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("m", 1e-3),
    ("u", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("f", 1e-15),
];

/// Floating-point value in engineering notation
///
/// # Parsing formats
/// - `8000`, `8e3` - plain numbers
/// - `8k`, `1.5M`, `100m`, `2.2u` - SI suffix (case-sensitive: `m` is milli,
///   `M` is mega)
///
/// # Example
/// ```
/// use tapline::config::EngFloat;
///
/// let rate: EngFloat = "1.2M".parse().unwrap();
/// assert_eq!(rate.value(), 1_200_000.0);
/// assert_eq!(rate.to_string(), "1.2M");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngFloat(f64);

impl EngFloat {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<EngFloat> for f64 {
    fn from(v: EngFloat) -> f64 {
        v.0
    }
}

impl FromStr for EngFloat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty value".to_string());
        }

        let (num, scale) = ENG_SUFFIXES
            .iter()
            .find_map(|&(suffix, scale)| s.strip_suffix(suffix).map(|n| (n, scale)))
            .unwrap_or((s, 1.0));

        let value: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid number: {}", s))?;
        let value = value * scale;
        if !value.is_finite() {
            return Err(format!("value out of range: {}", s));
        }
        Ok(Self(value))
    }
}

impl fmt::Display for EngFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v == 0.0 || !v.is_finite() {
            return write!(f, "{}", v);
        }
        let magnitude = v.abs();
        let (large, small): (Vec<_>, Vec<_>) =
            ENG_SUFFIXES.iter().partition(|&&(_, scale)| scale > 1.0);
        for &(suffix, scale) in large {
            if magnitude >= scale {
                return write!(f, "{}{}", round_sig(v / scale), suffix);
            }
        }
        if magnitude >= 1.0 {
            return write!(f, "{}", round_sig(v));
        }
        for &(suffix, scale) in small {
            if magnitude >= scale {
                return write!(f, "{}{}", round_sig(v / scale), suffix);
            }
        }
        write!(f, "{:e}", v)
    }
}

// Trim float noise (e.g. 1.2000000000000002) from displayed values.
fn round_sig(v: f64) -> f64 {
    (v * 1e9).round() / 1e9
}

/// Complete demo configuration
///
/// Use `DemoConfig::default()` for the classic 8 kHz / 1 kHz / 80 dB setup.
///
/// # Example
/// ```
/// use tapline::config::DemoConfig;
///
/// let mut config = DemoConfig::default();
/// config.decimation = 4;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Number of noise samples passed through the filter
    pub num_samples: usize,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Low-pass cutoff in Hz
    pub bandwidth: f64,
    /// Transition band width in Hz
    pub transition_width: f64,
    /// Minimum stopband attenuation in dB
    pub attenuation_db: f64,
    /// Filter DC gain
    pub gain: f64,
    /// Keep one output per this many inputs
    pub decimation: usize,
    /// Tap design algorithm
    pub method: DesignMethod,
    /// Noise source settings
    pub noise: NoiseConfig,
    /// PSD estimation settings
    pub spectrum: SpectrumConfig,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseConfig {
    #[serde(rename = "type")]
    pub noise_type: NoiseType,
    pub amplitude: f32,
    /// Fixed seed for reproducible runs; random when absent
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpectrumConfig {
    pub nfft: usize,
    /// Samples shared between Welch segments (default: nfft / 4)
    pub overlap: Option<usize>,
    pub window: Window,
}

impl SpectrumConfig {
    pub fn overlap(&self) -> usize {
        self.overlap.unwrap_or(self.nfft / 4)
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            num_samples: DEFAULT_NUM_SAMPLES,
            sample_rate: DEFAULT_SAMPLE_RATE,
            bandwidth: DEFAULT_BANDWIDTH,
            transition_width: DEFAULT_TRANSITION_WIDTH,
            attenuation_db: DEFAULT_ATTENUATION_DB,
            gain: 1.0,
            decimation: 1,
            method: DesignMethod::default(),
            noise: NoiseConfig::default(),
            spectrum: SpectrumConfig::default(),
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            noise_type: NoiseType::Gaussian,
            amplitude: 1.0,
            seed: None,
        }
    }
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            nfft: DEFAULT_NFFT,
            overlap: None,
            window: Window::default(),
        }
    }
}

impl DemoConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FilterError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Validated filter specification derived from this configuration
    pub fn filter_spec(&self) -> Result<FilterSpec> {
        FilterSpec::with_gain(
            self.gain,
            self.sample_rate,
            self.bandwidth,
            self.transition_width,
            self.attenuation_db,
        )
    }

    /// Check every section without running anything
    pub fn validate(&self) -> Result<()> {
        self.filter_spec()?;
        if self.decimation == 0 {
            return Err(FilterError::InvalidFilter(
                "decimation factor must be at least 1".to_string(),
            ));
        }
        if self.spectrum.nfft == 0 {
            return Err(FilterError::Config("nfft must be positive".to_string()));
        }
        if self.spectrum.overlap() >= self.spectrum.nfft {
            return Err(FilterError::Config(format!(
                "overlap {} must be smaller than nfft {}",
                self.spectrum.overlap(),
                self.spectrum.nfft
            )));
        }
        if !self.noise.amplitude.is_finite() || self.noise.amplitude < 0.0 {
            return Err(FilterError::Config(format!(
                "noise amplitude must be non-negative, got {}",
                self.noise.amplitude
            )));
        }
        Ok(())
    }

    /// Sample rate after decimation
    pub fn output_sample_rate(&self) -> f64 {
        self.sample_rate / self.decimation.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eng_float_plain() {
        let v: EngFloat = "8000".parse().unwrap();
        assert_eq!(v.value(), 8000.0);
        let v: EngFloat = "8e3".parse().unwrap();
        assert_eq!(v.value(), 8000.0);
        let v: EngFloat = " -2.5 ".parse().unwrap();
        assert_eq!(v.value(), -2.5);
    }

    #[test]
    fn test_eng_float_suffixes() {
        let cases = [
            ("8k", 8e3),
            ("1.5M", 1.5e6),
            ("2G", 2e9),
            ("100m", 0.1),
            ("3u", 3e-6),
            ("10n", 1e-8),
        ];
        for (s, expected) in cases {
            let v: EngFloat = s.parse().unwrap();
            assert!(
                (v.value() - expected).abs() <= expected.abs() * 1e-12,
                "{} parsed as {}",
                s,
                v.value()
            );
        }
    }

    #[test]
    fn test_eng_float_invalid() {
        assert!("".parse::<EngFloat>().is_err());
        assert!("abc".parse::<EngFloat>().is_err());
        assert!("k".parse::<EngFloat>().is_err());
        assert!("1x".parse::<EngFloat>().is_err());
        assert!("1e400".parse::<EngFloat>().is_err());
    }

    #[test]
    fn test_eng_float_display() {
        assert_eq!(EngFloat::new(8000.0).to_string(), "8k");
        assert_eq!(EngFloat::new(1_200_000.0).to_string(), "1.2M");
        assert_eq!(EngFloat::new(0.1).to_string(), "100m");
        assert_eq!(EngFloat::new(80.0).to_string(), "80");
        assert_eq!(EngFloat::new(0.0).to_string(), "0");
    }

    #[test]
    fn test_default_config_matches_cli_defaults() {
        let config = DemoConfig::default();
        assert_eq!(config.num_samples, 10_000);
        assert_eq!(config.sample_rate, 8000.0);
        assert_eq!(config.bandwidth, 1000.0);
        assert_eq!(config.transition_width, 100.0);
        assert_eq!(config.attenuation_db, 80.0);
        assert_eq!(config.decimation, 1);
        assert_eq!(config.spectrum.overlap(), 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_override() {
        let config = DemoConfig::from_toml_str(
            r#"
            sample_rate = 48000.0
            bandwidth = 5000.0
            decimation = 4
            method = "equiripple"

            [noise]
            type = "uniform"
            seed = 99

            [spectrum]
            nfft = 2048
            overlap = 1024
            window = "hann"
            "#,
        )
        .unwrap();
        assert_eq!(config.sample_rate, 48000.0);
        assert_eq!(config.bandwidth, 5000.0);
        assert_eq!(config.transition_width, 100.0);
        assert_eq!(config.decimation, 4);
        assert_eq!(config.method, DesignMethod::Equiripple);
        assert_eq!(config.noise.noise_type, NoiseType::Uniform);
        assert_eq!(config.noise.amplitude, 1.0);
        assert_eq!(config.noise.seed, Some(99));
        assert_eq!(config.spectrum.overlap(), 1024);
        assert_eq!(config.spectrum.window, Window::Hann);
        assert_eq!(config.output_sample_rate(), 12000.0);
    }

    #[test]
    fn test_toml_rejects_unknown_keys() {
        assert!(DemoConfig::from_toml_str("bandwith = 1000.0").is_err());
        assert!(DemoConfig::from_toml_str("[noise]\nsigma = 1.0").is_err());
    }

    #[test]
    fn test_validate_catches_bad_values() {
        let mut config = DemoConfig::default();
        config.decimation = 0;
        assert!(matches!(
            config.validate(),
            Err(FilterError::InvalidFilter(_))
        ));

        let mut config = DemoConfig::default();
        config.bandwidth = 3990.0;
        assert!(matches!(config.validate(), Err(FilterError::InvalidSpec(_))));

        let mut config = DemoConfig::default();
        config.spectrum.overlap = Some(config.spectrum.nfft);
        assert!(matches!(config.validate(), Err(FilterError::Config(_))));

        let mut config = DemoConfig::default();
        config.noise.amplitude = -1.0;
        assert!(config.validate().is_err());
    }
}
