//! Normalized fringe contrast of a window.

use crate::window::MinMaxPair;

/// Visibility `(max - min) / (max + min)` of one window.
///
/// The sum and difference are taken in 64-bit integers so extreme extrema
/// cannot overflow. A zero denominator yields `0.0`.
pub fn visibility(pair: MinMaxPair) -> f64 {
    let max = i64::from(pair.max);
    let min = i64::from(pair.min);
    let denominator = max + min;
    if denominator == 0 {
        return 0.0;
    }
    (max - min) as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_contrast_is_one() {
        assert_eq!(visibility(MinMaxPair { min: 0, max: 15 }), 1.0);
    }

    #[test]
    fn flat_window_is_zero() {
        assert_eq!(visibility(MinMaxPair { min: 1, max: 1 }), 0.0);
    }

    #[test]
    fn degenerate_window_is_zero_not_nan() {
        let value = visibility(MinMaxPair { min: 0, max: 0 });
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
    }

    #[test]
    fn opposite_sign_extrema_are_guarded() {
        let value = visibility(MinMaxPair { min: -4, max: 4 });
        assert_eq!(value, 0.0);
    }

    #[test]
    fn partial_contrast() {
        let value = visibility(MinMaxPair { min: 10, max: 30 });
        assert!((value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn extreme_extrema_do_not_overflow() {
        let value = visibility(MinMaxPair {
            min: i32::MAX,
            max: i32::MAX,
        });
        assert_eq!(value, 0.0);
        let value = visibility(MinMaxPair {
            min: 0,
            max: i32::MAX,
        });
        assert_eq!(value, 1.0);
    }
}
