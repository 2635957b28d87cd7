//! Running the pipeline over a set of stream files.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use log::{info, warn};

use crate::config::WindowConfig;
use crate::error::{PipelineError, Stage};
use crate::line::Line;
use crate::pipeline::process_file;

/// File extension of acquisition stream files.
pub const STREAM_EXTENSION: &str = "bin";

/// Options for processing several files.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Maximum number of file pipelines running at the same time.
    pub parallel_files: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel_files: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub result: Result<Line, PipelineError>,
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<FileResult>,
}

impl BatchReport {
    /// Lines of every file that was processed successfully.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.results.iter().filter_map(|r| r.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &PipelineError)> {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|err| (r.path.as_path(), err)))
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.results
            .into_iter()
            .filter_map(|r| r.result.ok())
            .collect()
    }
}

fn is_stream_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == STREAM_EXTENSION)
        .unwrap_or(false)
}

/// Find the stream files to process.
///
/// A path to a stream file yields itself; a directory yields its stream files
/// (not recursing, symlinks followed), sorted by path. Anything else yields
/// nothing.
///
/// # Errors
/// Returns an error if the path or directory cannot be read.
pub fn discover_stream_files(path: impl AsRef<Path>) -> Result<Vec<PathBuf>, PipelineError> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|err| PipelineError::stat(path, err))?;

    if !metadata.is_dir() {
        return Ok(if is_stream_file(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let candidate = entry?.path();
        if candidate.is_file() && is_stream_file(&candidate) {
            info!("Found file: {}", candidate.display());
            files.push(candidate);
        }
    }
    files.sort();
    Ok(files)
}

/// Process every file independently and concurrently.
///
/// At most `options.parallel_files` pipelines run at once. Workers pull the
/// next file as soon as they finish one. A failing file is logged and recorded
/// in the report; it never stops the others.
pub fn process_files<P>(
    paths: &[P],
    config: &WindowConfig,
    options: &BatchOptions,
) -> BatchReport
where
    P: AsRef<Path> + Sync,
{
    let workers = options.parallel_files.min(paths.len()).max(1);
    let next = &AtomicUsize::new(0);
    let mut slots: Vec<Option<Result<Line, PipelineError>>> = Vec::with_capacity(paths.len());
    slots.resize_with(paths.len(), || None);

    thread::scope(|scope| {
        let handles = (0..workers)
            .map(|_| {
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let idx = next.fetch_add(1, Ordering::Relaxed);
                        let Some(path) = paths.get(idx) else {
                            break;
                        };
                        let path: &Path = path.as_ref();
                        let result = panic::catch_unwind(AssertUnwindSafe(|| {
                            process_file(path, config)
                        }))
                        .unwrap_or_else(|_| {
                            Err(PipelineError::StagePanicked {
                                path: path.to_path_buf(),
                                stage: Stage::Reduce,
                            })
                        });
                        done.push((idx, result));
                    }
                    done
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            for (idx, result) in handle.join().unwrap_or_default() {
                slots[idx] = Some(result);
            }
        }
    });

    let results = paths
        .iter()
        .zip(slots)
        .map(|(path, slot)| {
            let path = path.as_ref();
            let result = slot.unwrap_or_else(|| {
                Err(PipelineError::StagePanicked {
                    path: path.to_path_buf(),
                    stage: Stage::Reduce,
                })
            });
            if let Err(err) = &result {
                warn!("skipping {}: {}", path.display(), err);
            }
            FileResult {
                path: path.to_path_buf(),
                result,
            }
        })
        .collect();

    BatchReport { results }
}

/// Discover and process all stream files under `path`.
///
/// # Errors
/// Returns [`PipelineError::NoInputFiles`] when there is nothing to process,
/// or the discovery error. Per-file failures are in the report instead.
pub fn process_directory(
    path: impl AsRef<Path>,
    config: &WindowConfig,
    options: &BatchOptions,
) -> Result<BatchReport, PipelineError> {
    let path = path.as_ref();
    let files = discover_stream_files(path)?;
    if files.is_empty() {
        return Err(PipelineError::NoInputFiles {
            path: path.to_path_buf(),
        });
    }
    Ok(process_files(&files, config, options))
}
