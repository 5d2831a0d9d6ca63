use super::{Formatter, iso8601_timestamp, opt_db};
use crate::processing::FilterSummary;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, summary: &FilterSummary) -> String {
        format!(
            "{},{},{},{},{},{},{},{:.2},{:.2},{:.1},{},{}",
            iso8601_timestamp(),
            summary.method,
            summary.num_taps,
            summary.sample_rate,
            summary.decimation,
            summary.input_len,
            summary.output_len,
            summary.source_power_db,
            summary.filtered_power_db,
            summary.passband_psd_db,
            opt_db(summary.stopband_psd_db, ""),
            opt_db(summary.measured_attenuation_db, "")
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some(
            "ts,method,num_taps,sample_rate,decimation,input_len,output_len,source_power_db,filtered_power_db,passband_psd_db,stopband_psd_db,measured_attenuation_db",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_summary;

    #[test]
    fn test_csv_row_matches_header() {
        let formatter = CsvFormatter;
        let row = formatter.format(&sample_summary());
        let columns = formatter.header().unwrap().split(',').count();
        assert_eq!(row.split(',').count(), columns);
        assert!(row.ends_with(",-121.5,82.5"));
    }

    #[test]
    fn test_csv_missing_stopband_is_empty() {
        let mut summary = sample_summary();
        summary.stopband_psd_db = None;
        summary.measured_attenuation_db = None;
        let row = CsvFormatter.format(&summary);
        assert!(row.ends_with(",-39.0,,"));
    }
}
