use super::{Formatter, iso8601_timestamp};
use crate::processing::FilterSummary;

pub struct JsonFormatter;

#[derive(serde::Serialize)]
struct JsonRecord<'a> {
    ts: String,
    #[serde(flatten)]
    summary: &'a FilterSummary,
}

impl Formatter for JsonFormatter {
    fn format(&self, summary: &FilterSummary) -> String {
        let record = JsonRecord {
            ts: iso8601_timestamp(),
            summary,
        };
        serde_json::to_string(&record).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_summary;

    #[test]
    fn test_json_fields() {
        let line = JsonFormatter.format(&sample_summary());
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["num_taps"], 403);
        assert_eq!(value["method"], "kaiser");
        assert_eq!(value["stopband_psd_db"], -121.5);
        assert!(value["source_i"].is_null());
        assert!(value["ts"].as_str().unwrap().ends_with('Z'));
    }
}
