use std::io::Cursor;

use fringe_lib::baseline::scan_baseline;
use fringe_lib::line::LineBuilder;
use fringe_lib::samples::{decode_record, encode_record, SampleReader};
use fringe_lib::visibility::visibility;
use fringe_lib::window::{reduce_windows, MinMaxPair};
use fringe_lib::{process_stream, ExperimentParameters, WindowConfig};
use proptest::prelude::*;

fn config(window_size: usize) -> WindowConfig {
    WindowConfig::from_parameters(&ExperimentParameters {
        time: 1.0,
        sample_interval: 1.0,
        translator_speed: 1.0,
        wavelength: window_size as f64,
        period_count: 1,
    })
    .expect("config")
}

proptest! {
    #[test]
    fn record_round_trip_is_exact(sample in any::<i32>()) {
        prop_assert_eq!(decode_record(encode_record(sample)), sample);
    }

    #[test]
    fn decode_ignores_upper_word(upper in any::<u32>(), sample in any::<i32>()) {
        let word = (u64::from(upper) << 32) | u64::from(sample as u32);
        prop_assert_eq!(decode_record(word.to_be_bytes()), sample);
    }

    #[test]
    fn baseline_is_never_positive(samples in prop::collection::vec(any::<i32>(), 1..200)) {
        let expected = samples.iter().copied().min().unwrap().min(0);
        let bytes: Vec<u8> = samples.iter().flat_map(|&s| encode_record(s)).collect();
        let baseline = scan_baseline(SampleReader::new(Cursor::new(bytes))).unwrap();
        prop_assert_eq!(baseline, expected);
    }

    #[test]
    fn reducer_emits_floor_of_windows(
        samples in prop::collection::vec(-1000..1000_i32, 0..300),
        window_size in 1..40_usize,
    ) {
        let pairs = reduce_windows(&samples, window_size, 0);
        prop_assert_eq!(pairs.len(), samples.len() / window_size);
        for pair in pairs {
            prop_assert!(pair.min <= pair.max);
        }
    }

    #[test]
    fn visibility_is_bounded_for_nonnegative_windows(a in 0..i32::MAX, b in 0..i32::MAX) {
        let value = visibility(MinMaxPair { min: a.min(b), max: a.max(b) });
        prop_assert!((0.0..=1.0).contains(&value));
    }

    #[test]
    fn zero_index_is_first_global_maximum(values in prop::collection::vec(0..20_u8, 1..100)) {
        let mut builder = LineBuilder::new("prop");
        builder.extend(values.iter().map(|&v| f64::from(v) / 20.0));
        let line = builder.finish();

        let best = *values.iter().max().unwrap();
        let first = values.iter().position(|&v| v == best).unwrap();
        prop_assert_eq!(line.zero_index(), first);
    }

    #[test]
    fn pipeline_matches_in_memory_reduction(
        samples in prop::collection::vec(-500..500_i32, 0..2500),
        window_size in 1..16_usize,
    ) {
        let baseline = samples.iter().copied().min().unwrap_or(0).min(0);
        let expected: Vec<f64> = reduce_windows(&samples, window_size, baseline)
            .into_iter()
            .map(visibility)
            .collect();

        let bytes: Vec<u8> = samples.iter().flat_map(|&s| encode_record(s)).collect();
        let line = process_stream("prop", Cursor::new(bytes), &config(window_size)).unwrap();
        prop_assert_eq!(line.points(), expected.as_slice());
    }
}
