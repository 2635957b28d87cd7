//! Decoding of raw acquisition stream files into signed samples.
//!
//! A stream file is a flat sequence of 8-byte big-endian records, one per
//! acquisition tick. Only the low 32 bits of each record carry the sample;
//! the upper word is present in the device format but unused.

mod reader;
mod writer;

use std::fs::File;
use std::path::Path;

pub use reader::SampleReader;
#[cfg(test)]
pub(crate) use reader::READ_BUFFER_LEN;
pub use writer::SampleWriter;

use crate::error::{PipelineError, Stage};

/// Size of one acquisition record in bytes.
pub const RECORD_LEN: usize = 8;

/// Decode one record, keeping the low 32 bits as a two's-complement sample.
pub fn decode_record(record: [u8; RECORD_LEN]) -> i32 {
    u64::from_be_bytes(record) as i32
}

/// Encode a sample as a record with a zero upper word.
pub fn encode_record(sample: i32) -> [u8; RECORD_LEN] {
    u64::from(sample as u32).to_be_bytes()
}

/// Number of whole records in a stream of `byte_len` bytes.
///
/// Up to 7 trailing bytes of a partial record are ignored.
pub fn record_count(byte_len: u64) -> u64 {
    byte_len / RECORD_LEN as u64
}

/// Read the first `limit` raw samples of a stream file.
///
/// This is the interference preview: the untouched fringe signal at the start
/// of a scan, without baseline correction or windowing. Shorter files return
/// every sample they hold.
///
/// # Errors
/// Returns an error if the file cannot be opened or a read fails.
pub fn read_interference(
    path: impl AsRef<Path>,
    limit: usize,
) -> Result<Vec<i32>, PipelineError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| PipelineError::open(path, err))?;

    SampleReader::new(file)
        .take(limit)
        .collect::<std::io::Result<Vec<i32>>>()
        .map_err(|err| PipelineError::read(path, Stage::Decode, err))
}
