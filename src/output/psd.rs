use crate::error::Result;
use crate::signal_processing::{Psd, TapSequence, power_to_db};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write both spectra in long format for external plotting
///
/// Columns: `series,frequency_hz,power_db`, with series `source` or
/// `filtered`. The two series may have different frequency axes when the
/// filter decimates.
pub fn write_psd_csv(path: impl AsRef<Path>, source: &Psd, filtered: &Psd) -> Result<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    writeln!(out, "series,frequency_hz,power_db")?;
    for (name, psd) in [("source", source), ("filtered", filtered)] {
        for (f, p) in psd.frequencies.iter().zip(&psd.power) {
            writeln!(out, "{},{},{:.3}", name, f, power_to_db(*p))?;
        }
    }
    out.flush()?;
    log::debug!("Wrote PSD to {}", path.as_ref().display());
    Ok(())
}

/// Write tap index and coefficient, one per line
pub fn write_taps_csv(path: impl AsRef<Path>, taps: &TapSequence) -> Result<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    writeln!(out, "index,tap")?;
    for (i, t) in taps.taps().iter().enumerate() {
        writeln!(out, "{},{:e}", i, t)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psd_csv_layout() {
        let source = Psd {
            frequencies: vec![-1.0, 0.0],
            power: vec![1.0, 0.1],
        };
        let filtered = Psd {
            frequencies: vec![0.0],
            power: vec![0.01],
        };
        let path = std::env::temp_dir().join(format!("tapline_psd_{}.csv", std::process::id()));
        write_psd_csv(&path, &source, &filtered).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "series,frequency_hz,power_db",
                "source,-1,0.000",
                "source,0,-10.000",
                "filtered,0,-20.000",
            ]
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_taps_csv_line_count() {
        let taps = TapSequence::new(vec![0.25, 0.5, 0.25]).unwrap();
        let path = std::env::temp_dir().join(format!("tapline_taps_{}.csv", std::process::id()));
        write_taps_csv(&path, &taps).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(content.contains("1,5e-1"));
        std::fs::remove_file(&path).ok();
    }
}
