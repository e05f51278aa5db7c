//! Error types for banditnn-io.

use std::path::PathBuf;

use banditnn_point::PointError;

/// Error type for all fallible operations in the banditnn-io crate.
///
/// Covers missing files, operating-system I/O failures, malformed input and
/// point sets that parse but fail validation.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an operating-system I/O failure.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a data line cannot be parsed.
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        /// File being read.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a file header is missing or unsupported.
    #[error("bad header in {}: {reason}", path.display())]
    Header {
        /// File being read.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the parsed points do not form a valid point set.
    #[error(transparent)]
    Point(#[from] PointError),
}

impl IoError {
    pub(crate) fn io(path: impl Into<PathBuf>, e: std::io::Error) -> Self {
        IoError::Io {
            path: path.into(),
            reason: e.to_string(),
        }
    }
}
