mod csv;
mod json;
mod psd;
mod text;

use chrono::Utc;

use crate::processing::FilterSummary;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::psd::{write_psd_csv, write_taps_csv};
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

pub trait Formatter: Send {
    fn format(&self, summary: &FilterSummary) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn opt_db(value: Option<f64>, missing: &str) -> String {
    value.map_or(missing.to_string(), |v| format!("{:.1}", v))
}

#[cfg(test)]
pub(crate) fn sample_summary() -> FilterSummary {
    FilterSummary {
        method: "kaiser".to_string(),
        num_taps: 403,
        group_delay_samples: 201,
        sample_rate: 8000.0,
        decimation: 1,
        input_len: 10000,
        output_len: 10000,
        source_i: None,
        source_q: None,
        source_power_db: 0.02,
        filtered_power_db: -6.01,
        passband_psd_db: -39.0,
        stopband_psd_db: Some(-121.5),
        measured_attenuation_db: Some(82.5),
    }
}
