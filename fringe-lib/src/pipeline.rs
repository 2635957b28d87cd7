//! Two-pass, two-stage visibility pipeline for a single stream file.
//!
//! Pass one scans the whole stream for its baseline. Pass two runs a decode
//! thread that pushes blocks of samples through a bounded channel to the
//! calling thread, which reduces them into windows and folds the visibility of
//! each window into a [`Line`].

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::mpsc::{self, SyncSender};
use std::thread;
use std::time::Instant;

use log::{debug, info, warn};

use crate::baseline::scan_baseline;
use crate::config::WindowConfig;
use crate::error::{PipelineError, Stage};
use crate::line::{line_name, Line, LineBuilder};
use crate::samples::{record_count, SampleReader};
use crate::visibility::visibility;
use crate::window::WindowReducer;

/// Samples per block handed from the decode stage to the reduce stage.
pub const BLOCK_LEN: usize = 1 << 10;
/// Blocks that may wait in the channel before the decode stage blocks.
pub const QUEUE_DEPTH: usize = 4;

type SampleBlock = Vec<i32>;

#[derive(Debug, Default)]
struct DecodeSummary {
    samples: u64,
    trailing_bytes: usize,
}

/// Compute the visibility line of one stream file.
///
/// # Errors
/// Returns an error naming the file and stage if the file cannot be opened or
/// inspected, or if either pass hits a read error. Other files are unaffected.
pub fn process_file(path: impl AsRef<Path>, config: &WindowConfig) -> Result<Line, PipelineError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| PipelineError::open(path, err))?;
    let byte_len = file
        .metadata()
        .map_err(|err| PipelineError::stat(path, err))?
        .len();

    run(path, line_name(path), file, Some(byte_len), config)
}

/// Compute a visibility line from any seekable source, e.g. an in-memory
/// stream. `name` is used both as the line name and in error messages.
///
/// # Errors
/// Returns an error if either pass hits a read error.
pub fn process_stream<R>(
    name: &str,
    source: R,
    config: &WindowConfig,
) -> Result<Line, PipelineError>
where
    R: Read + Seek + Send + 'static,
{
    run(Path::new(name), name.to_string(), source, None, config)
}

fn run<R>(
    path: &Path,
    name: String,
    mut source: R,
    byte_len: Option<u64>,
    config: &WindowConfig,
) -> Result<Line, PipelineError>
where
    R: Read + Seek + Send + 'static,
{
    let started = Instant::now();
    let window_size = config.window_size();

    let baseline = scan_baseline(SampleReader::new(&mut source))
        .map_err(|err| PipelineError::read(path, Stage::Baseline, err))?;
    source
        .seek(SeekFrom::Start(0))
        .map_err(|err| PipelineError::read(path, Stage::Decode, err))?;
    debug!("{}: baseline {}, window {} samples", name, baseline, window_size);

    let expected_windows = byte_len
        .map(|len| (record_count(len) / window_size as u64) as usize)
        .unwrap_or(0);

    let (sender, receiver) = mpsc::sync_channel::<std::io::Result<SampleBlock>>(QUEUE_DEPTH);
    let decoder = thread::spawn(move || decode_stage(source, sender));

    let mut reducer = WindowReducer::new(window_size, baseline);
    let mut builder = LineBuilder::with_capacity(name, expected_windows);
    let mut failure = None;

    // Ends once the decode stage drops its sender.
    for block in receiver {
        match block {
            Ok(samples) => {
                for sample in samples {
                    if let Some(pair) = reducer.push(sample) {
                        builder.push(visibility(pair));
                    }
                }
            }
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    let summary = decoder.join().map_err(|_| PipelineError::StagePanicked {
        path: path.to_path_buf(),
        stage: Stage::Decode,
    })?;

    if let Some(err) = failure {
        return Err(PipelineError::read(path, Stage::Decode, err));
    }

    if summary.trailing_bytes > 0 {
        warn!(
            "{}: ignored {} trailing bytes of an incomplete record",
            path.display(),
            summary.trailing_bytes
        );
    }

    let line = builder.finish();
    info!(
        "Visibility data for {} is calculated in {:?}: {} samples, {} windows, {} dropped",
        path.display(),
        started.elapsed(),
        summary.samples,
        line.len(),
        reducer.pending()
    );
    Ok(line)
}

/// Decode the source into blocks until end of stream, a read error, or the
/// reduce stage hanging up. Dropping `sender` on return closes the channel.
fn decode_stage<R: Read>(
    source: R,
    sender: SyncSender<std::io::Result<SampleBlock>>,
) -> DecodeSummary {
    let mut reader = SampleReader::new(source);
    let mut block = Vec::with_capacity(BLOCK_LEN);

    while let Some(sample) = reader.next() {
        match sample {
            Ok(sample) => {
                block.push(sample);
                if block.len() == BLOCK_LEN {
                    let full = std::mem::replace(&mut block, Vec::with_capacity(BLOCK_LEN));
                    if sender.send(Ok(full)).is_err() {
                        break;
                    }
                }
            }
            Err(err) => {
                block.clear();
                let _ = sender.send(Err(err));
                break;
            }
        }
    }

    if !block.is_empty() {
        let _ = sender.send(Ok(block));
    }

    DecodeSummary {
        samples: reader.samples_read(),
        trailing_bytes: reader.trailing_bytes(),
    }
}
