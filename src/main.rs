use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;

use tapline::config::{DemoConfig, EngFloat};
use tapline::output::{OutputFormat, create_formatter, write_psd_csv, write_taps_csv};
use tapline::run_comparison;
use tapline::save_iq_wav;
use tapline::signal_processing::DesignMethod;
use tapline::simulation::NoiseType;

#[derive(Parser, Debug)]
#[command(name = "tapline")]
#[command(about = "Filter complex noise through a designed low-pass FIR and compare spectra", long_about = None)]
struct Args {
    /// TOML configuration file (flags override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of samples to process [default: 10000]
    #[arg(short = 'N', long)]
    nsamples: Option<usize>,

    /// System sample rate, e.g. 8000 or 8k [default: 8k]
    #[arg(short = 's', long)]
    samplerate: Option<EngFloat>,

    /// Filter bandwidth [default: 1k]
    #[arg(short = 'B', long)]
    bandwidth: Option<EngFloat>,

    /// Transition band [default: 100]
    #[arg(short = 'T', long)]
    transition: Option<EngFloat>,

    /// Stopband attenuation in dB [default: 80]
    #[arg(short = 'A', long)]
    attenuation: Option<EngFloat>,

    /// Decimation factor [default: 1]
    #[arg(short = 'D', long)]
    decimation: Option<usize>,

    /// Filter DC gain [default: 1]
    #[arg(long)]
    gain: Option<EngFloat>,

    /// Tap design method
    #[arg(short = 'm', long, value_enum)]
    method: Option<DesignMethod>,

    /// Noise distribution
    #[arg(long, value_enum)]
    noise: Option<NoiseType>,

    /// Noise amplitude (RMS for gaussian, peak for uniform)
    #[arg(long)]
    amplitude: Option<f32>,

    /// Seed for reproducible noise
    #[arg(long)]
    seed: Option<u64>,

    /// FFT size for PSD estimates [default: 1024]
    #[arg(long)]
    nfft: Option<usize>,

    /// Report format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write source and filtered PSDs as CSV
    #[arg(long)]
    psd_csv: Option<PathBuf>,

    /// Write the designed taps as CSV
    #[arg(long)]
    taps_csv: Option<PathBuf>,

    /// Dump the source samples to a stereo IQ WAV file
    #[arg(long)]
    dump_source: Option<PathBuf>,

    /// Dump the filtered samples to a stereo IQ WAV file
    #[arg(long)]
    dump_filtered: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn apply_overrides(args: &Args, config: &mut DemoConfig) {
    if let Some(n) = args.nsamples {
        config.num_samples = n;
    }
    if let Some(v) = args.samplerate {
        config.sample_rate = v.value();
    }
    if let Some(v) = args.bandwidth {
        config.bandwidth = v.value();
    }
    if let Some(v) = args.transition {
        config.transition_width = v.value();
    }
    if let Some(v) = args.attenuation {
        config.attenuation_db = v.value();
    }
    if let Some(d) = args.decimation {
        config.decimation = d;
    }
    if let Some(v) = args.gain {
        config.gain = v.value();
    }
    if let Some(m) = args.method {
        config.method = m;
    }
    if let Some(n) = args.noise {
        config.noise.noise_type = n;
    }
    if let Some(a) = args.amplitude {
        config.noise.amplitude = a;
    }
    if args.seed.is_some() {
        config.noise.seed = args.seed;
    }
    if let Some(n) = args.nfft {
        config.spectrum.nfft = n;
    }
}

fn wav_rate(rate: f64) -> Result<u32> {
    let rounded = rate.round();
    if rounded < 1.0 || rounded > u32::MAX as f64 {
        bail!("sample rate {} cannot be stored in a WAV header", rate);
    }
    Ok(rounded as u32)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match &args.config {
        Some(path) => DemoConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DemoConfig::default(),
    };
    apply_overrides(&args, &mut config);
    config.validate().context("Invalid configuration")?;

    log::info!(
        "fs={} bw={} tw={} atten={} dB decim={} N={}",
        EngFloat::new(config.sample_rate),
        EngFloat::new(config.bandwidth),
        EngFloat::new(config.transition_width),
        config.attenuation_db,
        config.decimation,
        config.num_samples
    );

    let result = run_comparison(&config).context("Filter run failed")?;
    let (source_psd, filtered_psd) = result
        .psd_pair(&config.spectrum)
        .context("Spectrum estimation failed")?;
    let summary = result.summary(&filtered_psd);

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }
    println!("{}", formatter.format(&summary));

    if let Some(path) = &args.psd_csv {
        write_psd_csv(path, &source_psd, &filtered_psd)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.taps_csv {
        write_taps_csv(path, &result.taps)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.dump_source {
        save_iq_wav(path, &result.source, wav_rate(result.sample_rate())?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.dump_filtered {
        save_iq_wav(path, &result.filtered, wav_rate(result.output_sample_rate())?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}
