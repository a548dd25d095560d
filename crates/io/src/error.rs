use std::fmt;
use std::path::{Path, PathBuf};

/// Failures at the persistence boundary. Always recoverable by the caller.
#[derive(Debug)]
pub enum IoError {
    /// The file could not be opened or created.
    Open { path: PathBuf, message: String },
    /// Reading or decoding the content failed.
    Read { path: Option<PathBuf>, message: String },
    /// Writing or flushing the content failed.
    Write { path: Option<PathBuf>, message: String },
}

impl IoError {
    pub(crate) fn open(path: &Path, err: impl fmt::Display) -> Self {
        Self::Open { path: path.to_path_buf(), message: err.to_string() }
    }

    pub(crate) fn read(path: Option<&Path>, err: impl fmt::Display) -> Self {
        Self::Read { path: path.map(Path::to_path_buf), message: err.to_string() }
    }

    pub(crate) fn write(path: Option<&Path>, err: impl fmt::Display) -> Self {
        Self::Write { path: path.map(Path::to_path_buf), message: err.to_string() }
    }

    /// The file involved, when there was one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. } => Some(path),
            Self::Read { path, .. } | Self::Write { path, .. } => path.as_deref(),
        }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, message } => {
                write!(f, "cannot open file {}: {message}", path.display())
            }
            Self::Read { path: Some(path), message } => {
                write!(f, "cannot read {}: {message}", path.display())
            }
            Self::Read { path: None, message } => write!(f, "read error: {message}"),
            Self::Write { path: Some(path), message } => {
                write!(f, "cannot write {}: {message}", path.display())
            }
            Self::Write { path: None, message } => write!(f, "write error: {message}"),
        }
    }
}

impl std::error::Error for IoError {}
