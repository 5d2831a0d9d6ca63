mod test_signals;

use num_complex::Complex32;
use tapline::signal_processing::FirDecimator;
use tapline::{TapSequence, apply, design_low_pass};
use test_signals::{impulse, seeded_gaussian};

#[test]
fn test_single_tap_is_identity() {
    let input = seeded_gaussian(1000, 1);
    let output = apply(&[1.0], 1, &input).unwrap();
    assert_eq!(output, input);
}

#[test]
fn test_output_length_is_floor() {
    let taps = [0.25, 0.5, 0.25];
    for decimation in 1..=7 {
        for len in [0usize, 1, 2, 6, 7, 8, 100, 101] {
            let input = seeded_gaussian(len, len as u64);
            let output = apply(&taps, decimation, &input).unwrap();
            assert_eq!(
                output.len(),
                len / decimation,
                "L={} D={}",
                len,
                decimation
            );
        }
    }
}

#[test]
fn test_input_shorter_than_decimation_is_empty() {
    let input = seeded_gaussian(3, 9);
    assert!(apply(&[1.0], 4, &input).unwrap().is_empty());
}

#[test]
fn test_decimation_keeps_every_dth_output() {
    let taps = design_low_pass(1.0, 8000.0, 1000.0, 400.0, 50.0).unwrap();
    let input = seeded_gaussian(997, 42);
    let full = apply(taps.taps(), 1, &input).unwrap();

    for decimation in [2usize, 3, 5] {
        let decimated = apply(taps.taps(), decimation, &input).unwrap();
        for (k, y) in decimated.iter().enumerate() {
            assert_eq!(*y, full[(k + 1) * decimation - 1]);
        }
    }
}

#[test]
fn test_impulse_reproduces_taps() {
    let taps = design_low_pass(1.0, 8000.0, 1000.0, 500.0, 40.0).unwrap();
    let input = impulse(taps.len() + 10, 0);
    let output = apply(taps.taps(), 1, &input).unwrap();
    for (y, t) in output.iter().zip(taps.taps()) {
        assert!((y.re as f64 - t).abs() < 1e-6);
        assert_eq!(y.im, 0.0);
    }
    assert!(output[taps.len()..].iter().all(|y| y.norm() == 0.0));
}

#[test]
fn test_streaming_matches_one_shot() {
    let taps = TapSequence::new(vec![0.1, -0.2, 0.4, 0.7, 0.4, -0.2, 0.1]).unwrap();
    let input = seeded_gaussian(500, 5);
    let expected = apply(taps.taps(), 3, &input).unwrap();

    let mut filter = FirDecimator::new(taps, 3).unwrap();
    let mut streamed = Vec::new();
    for chunk in input.chunks(17) {
        streamed.extend(filter.process_buffer(chunk));
    }
    assert_eq!(streamed, expected);

    // Sample by sample as well
    filter.reset();
    let per_sample: Vec<Complex32> = input.iter().filter_map(|&s| filter.process(s)).collect();
    assert_eq!(per_sample, expected);
}

#[test]
fn test_invalid_filters_rejected() {
    let input = seeded_gaussian(10, 0);
    assert!(apply(&[], 1, &input).is_err());
    assert!(apply(&[1.0], 0, &input).is_err());
    assert!(apply(&[f64::NAN], 1, &input).is_err());
}
