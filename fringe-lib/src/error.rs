use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// First full pass computing the file baseline.
    Baseline,
    /// Second pass turning records into samples for the reducer.
    Decode,
    /// Window reduction and visibility fold.
    Reduce,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Baseline => write!(f, "baseline"),
            Self::Decode => write!(f, "decode"),
            Self::Reduce => write!(f, "reduce"),
        }
    }
}

/// Error type for stream decoding, per-file pipelines and batch discovery.
///
/// Every per-file variant carries the path so a batch caller can log the
/// failure and keep going with the remaining files.
#[derive(Debug)]
pub enum PipelineError {
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },
    Read {
        path: PathBuf,
        stage: Stage,
        source: std::io::Error,
    },
    StagePanicked {
        path: PathBuf,
        stage: Stage,
    },
    NoInputFiles {
        path: PathBuf,
    },
    Io(std::io::Error),
}

impl PipelineError {
    pub(crate) fn open(path: &Path, source: std::io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn stat(path: &Path, source: std::io::Error) -> Self {
        Self::Stat {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn read(path: &Path, stage: Stage, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            stage,
            source,
        }
    }

    /// Path of the file the error belongs to, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. }
            | Self::Stat { path, .. }
            | Self::Read { path, .. }
            | Self::StagePanicked { path, .. }
            | Self::NoInputFiles { path } => Some(path.as_path()),
            Self::Io(_) => None,
        }
    }

    /// Stage the error happened in, if it happened inside a running pipeline.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Read { stage, .. } | Self::StagePanicked { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open {}: {}", path.display(), source)
            }
            Self::Stat { path, source } => {
                write!(f, "failed to get file info for {}: {}", path.display(), source)
            }
            Self::Read {
                path,
                stage,
                source,
            } => write!(
                f,
                "read error in {} stage for {}: {}",
                stage,
                path.display(),
                source
            ),
            Self::StagePanicked { path, stage } => {
                write!(f, "{} stage panicked for {}", stage, path.display())
            }
            Self::NoInputFiles { path } => {
                write!(f, "no stream files found in {}", path.display())
            }
            Self::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Stat { source, .. } | Self::Read { source, .. } => {
                Some(source)
            }
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn display_names_file_and_stage() {
        let err = PipelineError::read(
            Path::new("scan.bin"),
            Stage::Decode,
            io::Error::new(io::ErrorKind::Other, "device gone"),
        );
        let message = err.to_string();
        assert!(message.contains("scan.bin"));
        assert!(message.contains("decode"));
        assert!(message.contains("device gone"));
        assert_eq!(err.stage(), Some(Stage::Decode));
        assert_eq!(err.path(), Some(Path::new("scan.bin")));
    }

    #[test]
    fn plain_io_errors_have_no_path() {
        let err = PipelineError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(err.path().is_none());
        assert!(err.stage().is_none());
    }
}
