use crate::error::{FilterError, Result};
use crate::signal_processing::TapSequence;
use num_complex::{Complex32, Complex64};

/// Decimating FIR filter for complex samples with real taps
///
/// Holds the delay line, tap coefficients, and decimation phase. Every input
/// sample enters the delay line; one output is produced after each run of
/// `decimation` inputs, so `L` inputs yield exactly `floor(L / decimation)`
/// outputs. History before the first sample is zero.
pub struct FirDecimator {
    taps: TapSequence,
    delay_line: Vec<Complex64>,
    pos: usize,
    decimation: usize,
    phase: usize,
}

impl FirDecimator {
    /// Create a decimating filter with the given taps
    ///
    /// # Errors
    /// Returns `FilterError::InvalidFilter` if `decimation` is zero.
    pub fn new(taps: TapSequence, decimation: usize) -> Result<Self> {
        if decimation == 0 {
            return Err(FilterError::InvalidFilter(
                "decimation factor must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            delay_line: vec![Complex64::new(0.0, 0.0); taps.len()],
            taps,
            pos: 0,
            decimation,
            phase: 0,
        })
    }

    /// Push one sample; returns an output on every `decimation`-th call
    pub fn process(&mut self, sample: Complex32) -> Option<Complex32> {
        let n = self.delay_line.len();
        self.delay_line[self.pos] = Complex64::new(sample.re as f64, sample.im as f64);

        self.phase += 1;
        let output = if self.phase == self.decimation {
            self.phase = 0;
            Some(self.convolve())
        } else {
            None
        };

        self.pos += 1;
        if self.pos == n {
            self.pos = 0;
        }
        output
    }

    // Newest sample sits at `pos`; pair it with taps[0] and walk backwards.
    fn convolve(&self) -> Complex32 {
        let taps = self.taps.taps();
        let n = taps.len();

        let mut acc = Complex64::new(0.0, 0.0);
        let mut tap_i = 0usize;
        for delay_idx in (0..=self.pos).rev() {
            acc += self.delay_line[delay_idx] * taps[tap_i];
            tap_i += 1;
        }
        for delay_idx in ((self.pos + 1)..n).rev() {
            acc += self.delay_line[delay_idx] * taps[tap_i];
            tap_i += 1;
        }
        debug_assert_eq!(tap_i, n);

        Complex32::new(acc.re as f32, acc.im as f32)
    }

    /// Filter a buffer, continuing from the current state
    pub fn process_buffer(&mut self, input: &[Complex32]) -> Vec<Complex32> {
        let mut output = Vec::with_capacity(input.len() / self.decimation + 1);
        for &sample in input {
            if let Some(y) = self.process(sample) {
                output.push(y);
            }
        }
        output
    }

    /// Clear history and decimation phase
    pub fn reset(&mut self) {
        self.delay_line.fill(Complex64::new(0.0, 0.0));
        self.pos = 0;
        self.phase = 0;
    }

    /// Get the number of taps (filter length)
    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    pub fn decimation(&self) -> usize {
        self.decimation
    }

    /// Get the group delay in input samples (half the filter length for linear phase)
    pub fn group_delay_samples(&self) -> usize {
        self.taps.group_delay_samples()
    }

    /// Get access to the tap coefficients
    pub fn taps(&self) -> &TapSequence {
        &self.taps
    }
}

/// Filter a complete sequence with fresh state
///
/// # Errors
/// Returns `FilterError::InvalidFilter` if `taps` is empty or `decimation`
/// is zero.
pub fn apply(taps: &[f64], decimation: usize, input: &[Complex32]) -> Result<Vec<Complex32>> {
    let taps = TapSequence::new(taps.to_vec())?;
    let mut filter = FirDecimator::new(taps, decimation)?;
    Ok(filter.process_buffer(input))
}
