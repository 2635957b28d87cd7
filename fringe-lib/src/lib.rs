//! # Fringe
//!
//! Streaming visibility analysis for scanning-interferometer acquisition files.
//!
//! A stream file holds one big-endian 8-byte record per acquisition tick. The
//! pipeline makes a first pass to find the file baseline, then decodes the file
//! a second time on a producer thread while the caller reduces fixed-size
//! windows to their min/max and folds each window's fringe visibility
//! `(max - min) / (max + min)` into a [`Line`].
//!
//! ```no_run
//! use fringe_lib::{process_file, ExperimentParameters, WindowConfig};
//!
//! let config = WindowConfig::from_parameters(&ExperimentParameters::default())?;
//! let line = process_file("stream_20240913-141148.bin", &config)?;
//! println!("{}: zero path difference at window {}", line.name(), line.zero_index());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod baseline;
pub mod batch;
pub mod config;
mod error;
pub mod line;
pub mod pipeline;
pub mod samples;
pub mod visibility;
pub mod window;

pub use batch::{process_directory, process_files, BatchOptions, BatchReport, FileResult};
pub use config::{ConfigError, ExperimentParameters, WindowConfig};
pub use error::{PipelineError, Stage};
pub use line::{Line, LineBuilder};
pub use pipeline::{process_file, process_stream};
pub use window::MinMaxPair;
