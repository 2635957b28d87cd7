//! Fixed-size, non-overlapping min/max windows over baseline-adjusted samples.

use serde::Serialize;

/// Extrema of one complete window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MinMaxPair {
    pub min: i32,
    pub max: i32,
}

/// Streaming reducer that emits one [`MinMaxPair`] per complete window.
///
/// Samples are shifted by the file baseline before comparison. Windows never
/// overlap and an incomplete final window is discarded, so `n` samples give
/// exactly `n / window_size` pairs.
#[derive(Debug)]
pub struct WindowReducer {
    window_size: usize,
    baseline: i32,
    current_min: i32,
    current_max: i32,
    count: usize,
}

impl WindowReducer {
    /// # Panics
    /// Panics if `window_size` is zero. [`crate::WindowConfig`] never produces
    /// an empty window.
    pub fn new(window_size: usize, baseline: i32) -> Self {
        assert!(window_size > 0, "window_size must be greater than zero");
        Self {
            window_size,
            baseline,
            current_min: i32::MAX,
            current_max: -i32::MAX,
            count: 0,
        }
    }

    /// Fold one raw sample in. Returns the window extrema when it completes one.
    pub fn push(&mut self, sample: i32) -> Option<MinMaxPair> {
        let value = sample.saturating_sub(self.baseline);
        self.current_min = self.current_min.min(value);
        self.current_max = self.current_max.max(value);
        self.count += 1;

        if self.count < self.window_size {
            return None;
        }

        let pair = MinMaxPair {
            min: self.current_min,
            max: self.current_max,
        };
        self.reset_window();
        Some(pair)
    }

    /// Samples buffered in the current, still incomplete window.
    pub fn pending(&self) -> usize {
        self.count
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    fn reset_window(&mut self) {
        self.current_min = i32::MAX;
        self.current_max = -i32::MAX;
        self.count = 0;
    }
}

/// Reduce an in-memory sample slice into window extrema.
pub fn reduce_windows(samples: &[i32], window_size: usize, baseline: i32) -> Vec<MinMaxPair> {
    let mut reducer = WindowReducer::new(window_size, baseline);
    samples
        .iter()
        .filter_map(|&sample| reducer.push(sample))
        .collect()
}
