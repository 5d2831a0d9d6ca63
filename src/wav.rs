use crate::error::Result;
use hound::{WavSpec, WavWriter};
use num_complex::Complex32;
use std::path::Path;

/// Write complex samples as a stereo float WAV (left = I, right = Q)
pub fn save_iq_wav(path: impl AsRef<Path>, samples: &[Complex32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)?;

    for sample in samples {
        writer.write_sample(sample.re)?;
        writer.write_sample(sample.im)?;
    }

    writer.finalize()?;
    log::debug!(
        "Wrote {} IQ samples to {}",
        samples.len(),
        path.as_ref().display()
    );
    Ok(())
}
