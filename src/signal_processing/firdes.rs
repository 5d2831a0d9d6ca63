use crate::constants::{
    EQUIRIPPLE_PASSBAND_RIPPLE_DB, MAX_ATTENUATION_DB, MAX_DESIGN_ITERATIONS, MAX_NUM_TAPS,
    MIN_NUM_TAPS, MIN_POWER_THRESHOLD, STOPBAND_MARGIN_DB,
};
use crate::error::{FilterError, Result};
use crate::signal_processing::TapSequence;
use crate::signal_processing::window::{kaiser, kaiser_beta};
use num_complex::Complex64;
use pm_remez::{BandSetting, constant, pm_parameters, pm_remez};
use rustfft::FftPlanner;
use std::f64::consts::PI;
use std::fmt;

const STOPBAND_OVERSAMPLING: usize = 32;

/// Low-pass design algorithm
///
/// Both methods honour the same contract: the stopband starting at
/// `bandwidth + transition_width / 2` sits at least `attenuation_db` below
/// the passband, and the taps sum to the requested gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignMethod {
    /// Windowed sinc with a Kaiser window
    #[default]
    Kaiser,
    /// Parks-McClellan optimal equiripple design
    Equiripple,
}

impl fmt::Display for DesignMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignMethod::Kaiser => write!(f, "kaiser"),
            DesignMethod::Equiripple => write!(f, "equiripple"),
        }
    }
}

/// Validated low-pass filter specification
///
/// All frequencies are in Hz. The cutoff is centred on `bandwidth`, so the
/// transition band spans `bandwidth ± transition_width / 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    sample_rate: f64,
    bandwidth: f64,
    transition_width: f64,
    attenuation_db: f64,
    gain: f64,
}

impl FilterSpec {
    /// Create a unity-gain specification
    ///
    /// # Errors
    /// Returns `FilterError::InvalidSpec` if any parameter is non-positive or
    /// non-finite, or if the stopband edge reaches Nyquist.
    pub fn new(
        sample_rate: f64,
        bandwidth: f64,
        transition_width: f64,
        attenuation_db: f64,
    ) -> Result<Self> {
        Self::with_gain(1.0, sample_rate, bandwidth, transition_width, attenuation_db)
    }

    pub fn with_gain(
        gain: f64,
        sample_rate: f64,
        bandwidth: f64,
        transition_width: f64,
        attenuation_db: f64,
    ) -> Result<Self> {
        let positive = [
            ("sample_rate", sample_rate),
            ("bandwidth", bandwidth),
            ("transition_width", transition_width),
            ("attenuation_db", attenuation_db),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(FilterError::InvalidSpec(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        // Also keeps the Kaiser beta far below where I0(beta) overflows
        if attenuation_db > MAX_ATTENUATION_DB {
            return Err(FilterError::InvalidSpec(format!(
                "attenuation {} dB exceeds the {} dB limit",
                attenuation_db, MAX_ATTENUATION_DB
            )));
        }
        if !gain.is_finite() {
            return Err(FilterError::InvalidSpec(format!(
                "gain must be finite, got {}",
                gain
            )));
        }

        let nyquist = sample_rate / 2.0;
        if bandwidth + transition_width / 2.0 >= nyquist {
            return Err(FilterError::InvalidSpec(format!(
                "stopband edge {} Hz (bandwidth={}, transition={}) must be below Nyquist {} Hz",
                bandwidth + transition_width / 2.0,
                bandwidth,
                transition_width,
                nyquist
            )));
        }

        Ok(Self {
            sample_rate,
            bandwidth,
            transition_width,
            attenuation_db,
            gain,
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn transition_width(&self) -> f64 {
        self.transition_width
    }

    pub fn attenuation_db(&self) -> f64 {
        self.attenuation_db
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Upper edge of the passband in Hz (may be ≤ 0 for very wide transitions)
    pub fn passband_edge(&self) -> f64 {
        self.bandwidth - self.transition_width / 2.0
    }

    /// Lower edge of the stopband in Hz
    pub fn stopband_edge(&self) -> f64 {
        self.bandwidth + self.transition_width / 2.0
    }

    /// Filter length needed to meet this specification
    ///
    /// Kaiser's estimate, rounded up to the next odd length. Monotone: a
    /// narrower transition or higher attenuation never yields fewer taps.
    pub fn estimate_num_taps(&self) -> Result<usize> {
        let trans_norm = self.transition_width / self.sample_rate;
        let estimate = ((self.attenuation_db - 7.95) / (14.36 * trans_norm)).ceil() + 1.0;
        if estimate > MAX_NUM_TAPS as f64 {
            return Err(FilterError::InvalidSpec(format!(
                "specification needs {:.0} taps (limit {})",
                estimate, MAX_NUM_TAPS
            )));
        }
        let num_taps = (estimate.max(MIN_NUM_TAPS as f64)) as usize;
        Ok(num_taps | 1)
    }
}

/// Design a low-pass filter with the default (Kaiser) method
///
/// # Arguments
/// * `gain` - DC gain; the returned taps sum to this value
/// * `sample_rate` - Sample rate in Hz
/// * `bandwidth` - Cutoff frequency in Hz (centre of the transition band)
/// * `transition_width` - Width of the transition band in Hz
/// * `attenuation_db` - Minimum stopband attenuation in dB
///
/// # Errors
/// Returns `FilterError::InvalidSpec` if the parameters violate positivity
/// or Nyquist constraints.
pub fn design_low_pass(
    gain: f64,
    sample_rate: f64,
    bandwidth: f64,
    transition_width: f64,
    attenuation_db: f64,
) -> Result<TapSequence> {
    let spec = FilterSpec::with_gain(
        gain,
        sample_rate,
        bandwidth,
        transition_width,
        attenuation_db,
    )?;
    design_low_pass_with(&spec, DesignMethod::Kaiser)
}

/// Design a low-pass filter for `spec` using `method`
///
/// Starts from the Kaiser length estimate and lengthens the filter until
/// the measured stopband peak is at least `attenuation_db` below the DC
/// gain, so the result never has fewer taps than `estimate_num_taps`.
pub fn design_low_pass_with(spec: &FilterSpec, method: DesignMethod) -> Result<TapSequence> {
    let target_db = -(spec.attenuation_db() + STOPBAND_MARGIN_DB);
    let db_per_tap = 14.36 * spec.transition_width() / spec.sample_rate();
    let mut num_taps = spec.estimate_num_taps()?;

    for _ in 0..MAX_DESIGN_ITERATIONS {
        let prototype = match method {
            DesignMethod::Kaiser => kaiser_low_pass(spec, num_taps),
            DesignMethod::Equiripple => equiripple_low_pass(spec, num_taps)?,
        };
        let unity = normalize_dc_gain(prototype, 1.0)?;
        let peak_db = stopband_peak_db(&unity, spec);

        if peak_db <= target_db {
            let taps = normalize_dc_gain(unity.into_inner(), spec.gain())?;
            log::info!(
                "Designed {} low-pass: {} taps, stopband peak {:.2} dB (fs={} Hz, bw={} Hz, tw={} Hz, atten={} dB)",
                method,
                taps.len(),
                peak_db,
                spec.sample_rate(),
                spec.bandwidth(),
                spec.transition_width(),
                spec.attenuation_db()
            );
            return Ok(taps);
        }

        // Even steps keep the length odd
        let shortfall = peak_db - target_db;
        let extra = (shortfall / db_per_tap).ceil().clamp(1.0, MAX_NUM_TAPS as f64) as usize;
        let step = extra + extra % 2;
        log::debug!(
            "{} taps reach {:.2} dB, need {:.2} dB; adding {}",
            num_taps,
            peak_db,
            target_db,
            step
        );
        num_taps += step;
        if num_taps > MAX_NUM_TAPS {
            return Err(FilterError::InvalidSpec(format!(
                "specification needs more than {} taps",
                MAX_NUM_TAPS
            )));
        }
    }

    Err(FilterError::Design(format!(
        "{} design did not reach {} dB within {} iterations",
        method,
        spec.attenuation_db(),
        MAX_DESIGN_ITERATIONS
    )))
}

/// Worst-case stopband magnitude in dB, from `stopband_edge` to Nyquist
///
/// Evaluated on a zero-padded FFT grid plus the exact band edge.
pub fn stopband_peak_db(taps: &TapSequence, spec: &FilterSpec) -> f64 {
    let fs = spec.sample_rate();
    let edge = spec.stopband_edge();
    let size = (taps.len() * STOPBAND_OVERSAMPLING)
        .next_power_of_two()
        .clamp(1024, 1 << 22);

    let mut buffer: Vec<Complex64> = taps
        .taps()
        .iter()
        .map(|&t| Complex64::new(t, 0.0))
        .collect();
    buffer.resize(size, Complex64::new(0.0, 0.0));
    FftPlanner::<f64>::new()
        .plan_fft_forward(size)
        .process(&mut buffer);

    let half = size / 2;
    let first = ((edge / fs * size as f64).ceil() as usize).min(half);
    let peak = buffer[first..=half]
        .iter()
        .map(|h| h.norm())
        .fold(0.0f64, f64::max);

    let grid_db = 20.0 * peak.max(MIN_POWER_THRESHOLD).log10();
    grid_db.max(taps.magnitude_db(edge, fs))
}

fn kaiser_low_pass(spec: &FilterSpec, num_taps: usize) -> Vec<f64> {
    let cutoff = spec.bandwidth() / spec.sample_rate();
    let window = kaiser(num_taps, kaiser_beta(spec.attenuation_db()));
    let center = (num_taps - 1) as f64 / 2.0;

    window
        .iter()
        .enumerate()
        .map(|(n, &w)| {
            let t = n as f64 - center;
            let ideal = if t == 0.0 {
                2.0 * cutoff
            } else {
                (2.0 * PI * cutoff * t).sin() / (PI * t)
            };
            ideal * w
        })
        .collect()
}

fn equiripple_low_pass(spec: &FilterSpec, num_taps: usize) -> Result<Vec<f64>> {
    let pass_end = spec.passband_edge() / spec.sample_rate();
    let stop_start = spec.stopband_edge() / spec.sample_rate();

    if pass_end <= 0.0 {
        return Err(FilterError::InvalidSpec(format!(
            "equiripple design needs bandwidth > transition/2 (bandwidth={}, transition={})",
            spec.bandwidth(),
            spec.transition_width()
        )));
    }

    let bands = [
        BandSetting::new(0.0, pass_end, constant(1.0))
            .map_err(|e| FilterError::Design(format!("Passband: {:?}", e)))?,
        BandSetting::with_weight(
            stop_start,
            0.5,
            constant(0.0),
            constant(stopband_weight(spec.attenuation_db())),
        )
        .map_err(|e| FilterError::Design(format!("Stopband: {:?}", e)))?,
    ];

    let params = pm_parameters(num_taps, &bands)
        .map_err(|e| FilterError::Design(format!("PM parameters: {:?}", e)))?;

    let design =
        pm_remez(&params).map_err(|e| FilterError::Design(format!("PM Remez: {:?}", e)))?;

    Ok(design.impulse_response)
}

/// Ratio of passband ripple to stopband ripple
///
/// Weighting the stopband by this ratio makes the optimal design trade the
/// two ripples in the requested proportion.
fn stopband_weight(attenuation_db: f64) -> f64 {
    let linear = 10f64.powf(EQUIRIPPLE_PASSBAND_RIPPLE_DB / 20.0);
    let passband_ripple = (linear - 1.0) / (linear + 1.0);
    let stopband_ripple = 10f64.powf(-attenuation_db / 20.0);
    passband_ripple / stopband_ripple
}

fn normalize_dc_gain(mut taps: Vec<f64>, gain: f64) -> Result<TapSequence> {
    let dc: f64 = taps.iter().sum();
    if dc.abs() < f64::EPSILON {
        return Err(FilterError::Design(
            "prototype filter has no DC response".to_string(),
        ));
    }
    let scale = gain / dc;
    for tap in taps.iter_mut() {
        *tap *= scale;
    }
    TapSequence::new(taps)
}
