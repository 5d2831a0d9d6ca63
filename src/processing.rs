use crate::config::{DemoConfig, SpectrumConfig};
use crate::error::Result;
use crate::signal_processing::{
    DesignMethod, FilterSpec, FirDecimator, Psd, TapSequence, design_low_pass_with, power_to_db,
    welch_psd,
};
use crate::simulation::{NoiseSource, signal_power};
use num_complex::Complex32;
use rolling_stats::Stats;

/// Source and filtered sequences from one run, retained for inspection
pub struct ComparisonResult {
    pub spec: FilterSpec,
    pub method: DesignMethod,
    pub taps: TapSequence,
    pub decimation: usize,
    pub source: Vec<Complex32>,
    pub filtered: Vec<Complex32>,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct StatsSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl StatsSummary {
    fn from_stats(stats: &Stats<f64>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

/// Scalar figures describing a run
#[derive(Debug, Clone, serde::Serialize)]
pub struct FilterSummary {
    pub method: String,
    pub num_taps: usize,
    pub group_delay_samples: usize,
    pub sample_rate: f64,
    pub decimation: usize,
    pub input_len: usize,
    pub output_len: usize,
    pub source_i: Option<StatsSummary>,
    pub source_q: Option<StatsSummary>,
    pub source_power_db: f64,
    pub filtered_power_db: f64,
    /// Mean PSD of the filtered output inside the passband
    pub passband_psd_db: f64,
    /// Mean PSD of the filtered output beyond the stopband edge, when the
    /// stopband lies below the output Nyquist frequency
    pub stopband_psd_db: Option<f64>,
    /// Passband minus stopband
    pub measured_attenuation_db: Option<f64>,
}

/// Generate noise per `config` and run it through the designed filter
pub fn run_comparison(config: &DemoConfig) -> Result<ComparisonResult> {
    config.validate()?;
    let mut source = NoiseSource::new(
        config.noise.noise_type,
        config.noise.amplitude,
        config.noise.seed,
    )?;
    let samples = source.head(config.num_samples);
    log::debug!(
        "Generated {} {:?} noise samples (amplitude {})",
        samples.len(),
        config.noise.noise_type,
        config.noise.amplitude
    );
    compare(config, samples)
}

/// Run an existing sequence through the filter described by `config`
pub fn compare(config: &DemoConfig, source: Vec<Complex32>) -> Result<ComparisonResult> {
    let spec = config.filter_spec()?;
    let taps = design_low_pass_with(&spec, config.method)?;
    log::info!("Num. taps: {}", taps.len());

    let mut filter = FirDecimator::new(taps.clone(), config.decimation)?;
    let filtered = filter.process_buffer(&source);
    log::info!(
        "Filtered {} samples into {} (decimation {})",
        source.len(),
        filtered.len(),
        config.decimation
    );

    Ok(ComparisonResult {
        spec,
        method: config.method,
        taps,
        decimation: config.decimation,
        source,
        filtered,
    })
}

impl ComparisonResult {
    pub fn sample_rate(&self) -> f64 {
        self.spec.sample_rate()
    }

    pub fn output_sample_rate(&self) -> f64 {
        self.spec.sample_rate() / self.decimation as f64
    }

    /// Welch PSD of the source (at the input rate) and of the filtered
    /// output (at the decimated rate)
    pub fn psd_pair(&self, spectrum: &SpectrumConfig) -> Result<(Psd, Psd)> {
        let source = welch_psd(
            &self.source,
            self.sample_rate(),
            spectrum.nfft,
            spectrum.overlap(),
            spectrum.window,
        )?;
        let filtered = welch_psd(
            &self.filtered,
            self.output_sample_rate(),
            spectrum.nfft,
            spectrum.overlap(),
            spectrum.window,
        )?;
        Ok((source, filtered))
    }

    /// Scalar figures for this run, measured on `filtered_psd` (the second
    /// half of `psd_pair`)
    pub fn summary(&self, filtered_psd: &Psd) -> FilterSummary {
        let mut stats_i: Stats<f64> = Stats::new();
        let mut stats_q: Stats<f64> = Stats::new();
        for s in &self.source {
            stats_i.update(s.re as f64);
            stats_q.update(s.im as f64);
        }

        // Keep a few bins clear of the band edges; the PSD window leaks into
        // its neighbours.
        let guard = 4.0 * filtered_psd.bin_width();
        let pass_high = (self.spec.passband_edge() - guard).max(filtered_psd.bin_width());
        let passband = filtered_psd.mean_power(0.0, pass_high).unwrap_or(0.0);

        let nyquist = self.output_sample_rate() / 2.0;
        let stop_low = self.spec.stopband_edge() + guard;
        let stopband = if stop_low < nyquist {
            filtered_psd.mean_power(stop_low, nyquist)
        } else {
            None
        };

        let passband_psd_db = power_to_db(passband);
        let stopband_psd_db = stopband.map(power_to_db);

        FilterSummary {
            method: self.method.to_string(),
            num_taps: self.taps.len(),
            group_delay_samples: self.taps.group_delay_samples(),
            sample_rate: self.sample_rate(),
            decimation: self.decimation,
            input_len: self.source.len(),
            output_len: self.filtered.len(),
            source_i: StatsSummary::from_stats(&stats_i),
            source_q: StatsSummary::from_stats(&stats_q),
            source_power_db: power_to_db(signal_power(&self.source)),
            filtered_power_db: power_to_db(signal_power(&self.filtered)),
            passband_psd_db,
            stopband_psd_db,
            measured_attenuation_db: stopband_psd_db.map(|s| passband_psd_db - s),
        }
    }
}
