//! Per-file visibility curves.

use std::path::Path;

use serde::Serialize;

/// Visibility curve of one stream file.
///
/// Built once by the pipeline and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    name: String,
    points: Vec<f64>,
    zero_index: usize,
}

impl Line {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Visibility per window, in stream order.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Index of the first maximum of the curve, taken as zero path difference.
    ///
    /// `0` for an empty line.
    pub fn zero_index(&self) -> usize {
        self.zero_index
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximum visibility, if the line has any points.
    pub fn peak(&self) -> Option<f64> {
        self.points.get(self.zero_index).copied()
    }

    /// Path difference in meters for every point, centred on the zero index.
    ///
    /// `length` is the optical path covered by the whole scan; each window
    /// spans `length / len` of it.
    pub fn path_difference_axis(&self, length: f64) -> Vec<f64> {
        if self.points.is_empty() {
            return Vec::new();
        }
        let dx = length / self.points.len() as f64;
        (0..self.points.len())
            .map(|i| (i as f64 - self.zero_index as f64) * dx)
            .collect()
    }

    pub fn into_points(self) -> Vec<f64> {
        self.points
    }
}

/// Accumulates visibility points and tracks the zero index while folding.
#[derive(Debug)]
pub struct LineBuilder {
    name: String,
    points: Vec<f64>,
    zero_index: usize,
}

impl LineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, 0)
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            points: Vec::with_capacity(capacity),
            zero_index: 0,
        }
    }

    /// Append a point. The zero index only moves on a strictly greater value.
    pub fn push(&mut self, value: f64) {
        if let Some(&best) = self.points.get(self.zero_index) {
            if value > best {
                self.zero_index = self.points.len();
            }
        }
        self.points.push(value);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn finish(self) -> Line {
        Line {
            name: self.name,
            points: self.points,
            zero_index: self.zero_index,
        }
    }
}

impl Extend<f64> for LineBuilder {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for value in iter {
            self.push(value);
        }
    }
}

/// Line name for a stream file: its file name without the extension.
pub fn line_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(values: &[f64]) -> Line {
        let mut builder = LineBuilder::new("test");
        builder.extend(values.iter().copied());
        builder.finish()
    }

    #[test]
    fn zero_index_tracks_first_maximum() {
        let line = build(&[0.1, 0.7, 0.3, 0.7, 0.2]);
        assert_eq!(line.zero_index(), 1);
        assert_eq!(line.peak(), Some(0.7));
    }

    #[test]
    fn zero_index_moves_on_strictly_greater_value() {
        let line = build(&[0.2, 0.2, 0.5, 0.9]);
        assert_eq!(line.zero_index(), 3);
    }

    #[test]
    fn all_zero_line_keeps_first_index() {
        let line = build(&[0.0; 8]);
        assert_eq!(line.zero_index(), 0);
        assert_eq!(line.len(), 8);
    }

    #[test]
    fn empty_line_defaults_to_zero_index() {
        let line = build(&[]);
        assert!(line.is_empty());
        assert_eq!(line.zero_index(), 0);
        assert_eq!(line.peak(), None);
        assert!(line.path_difference_axis(1.0).is_empty());
    }

    #[test]
    fn axis_is_centred_on_zero_index() {
        let line = build(&[0.1, 0.2, 0.9, 0.4]);
        let axis = line.path_difference_axis(0.64);
        assert_eq!(axis.len(), 4);
        assert_eq!(axis[2], 0.0);
        assert!((axis[0] + 0.32).abs() < 1e-12);
        assert!((axis[3] - 0.16).abs() < 1e-12);
    }

    #[test]
    fn name_drops_extension_and_directory() {
        assert_eq!(
            line_name(Path::new("data/stream_20240913-141148.bin")),
            "stream_20240913-141148"
        );
        assert_eq!(line_name(Path::new("scan")), "scan");
    }

    #[test]
    fn serializes_for_presentation() {
        let line = build(&[0.5, 1.0]);
        let json = serde_json::to_value(&line).expect("serialize");
        assert_eq!(json["name"], "test");
        assert_eq!(json["zero_index"], 1);
        assert_eq!(json["points"][1], 1.0);
    }
}
