//! First-pass reduction finding the baseline offset of a stream file.

use std::fs::File;
use std::path::Path;

use log::debug;

use crate::error::{PipelineError, Stage};
use crate::samples::SampleReader;

/// Fold a sample sequence into its baseline.
///
/// The running minimum starts at `0`, so the result is `min(0, min(samples))`:
/// only excursions below zero shift the data, a stream that never goes
/// negative keeps a baseline of `0`.
///
/// # Errors
/// Returns the first read error of the sequence.
pub fn scan_baseline<I>(samples: I) -> std::io::Result<i32>
where
    I: IntoIterator<Item = std::io::Result<i32>>,
{
    let mut minimum = 0_i32;
    for sample in samples {
        minimum = minimum.min(sample?);
    }
    Ok(minimum)
}

/// Run the baseline pass over a whole stream file.
///
/// # Errors
/// Returns an error if the file cannot be opened or a read fails mid-pass.
pub fn file_baseline(path: impl AsRef<Path>) -> Result<i32, PipelineError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| PipelineError::open(path, err))?;
    let baseline = scan_baseline(SampleReader::new(file))
        .map_err(|err| PipelineError::read(path, Stage::Baseline, err))?;
    debug!("baseline for {}: {}", path.display(), baseline);
    Ok(baseline)
}
