use super::{Formatter, opt_db};
use crate::processing::FilterSummary;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, summary: &FilterSummary) -> String {
        let mut out = format!(
            "Num. Taps: {} ({})\nSamples: {} in, {} out (decimation {})\nAttenuation: {} dB (passband {:.1} dB/Hz, stopband {} dB/Hz)",
            summary.num_taps,
            summary.method,
            summary.input_len,
            summary.output_len,
            summary.decimation,
            opt_db(summary.measured_attenuation_db, "-"),
            summary.passband_psd_db,
            opt_db(summary.stopband_psd_db, "-"),
        );
        if self.verbose {
            out.push_str(&format!(
                "\nGroup delay: {} samples\nPower: source {:.2} dB, filtered {:.2} dB",
                summary.group_delay_samples, summary.source_power_db, summary.filtered_power_db
            ));
            for (name, stats) in [("I", &summary.source_i), ("Q", &summary.source_q)] {
                if let Some(s) = stats {
                    out.push_str(&format!(
                        "\nSource {}: mean {:.4}, std {:.4}, range [{:.3}, {:.3}]",
                        name, s.mean, s.std_dev, s.min, s.max
                    ));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_summary;

    #[test]
    fn test_text_reports_tap_count() {
        let text = TextFormatter::new(false).format(&sample_summary());
        assert!(text.starts_with("Num. Taps: 403 (kaiser)"));
        assert!(text.contains("Attenuation: 82.5 dB"));
        assert!(!text.contains("Group delay"));
    }

    #[test]
    fn test_text_verbose_adds_details() {
        let text = TextFormatter::new(true).format(&sample_summary());
        assert!(text.contains("Group delay: 201 samples"));
    }
}
