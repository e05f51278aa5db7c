//! Error types for the banditnn-search crate.

use banditnn_point::PointError;
use banditnn_ucb::UcbError;

/// Broad category of a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Rejected before any sampling began.
    Config,
    /// Failed while running.
    Runtime,
}

/// Error type for all fallible operations in the banditnn-search crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// Wrapped error from the engine.
    #[error(transparent)]
    Ucb(#[from] UcbError),

    /// Wrapped error from point validation.
    #[error(transparent)]
    Point(#[from] PointError),

    /// Returned when a query index is not a valid query point.
    #[error("query index {index} out of range for {len} query points")]
    QueryOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of query points.
        len: usize,
    },

    /// Returned when query and candidate points have different dimensions.
    #[error("query dimension {queries} does not match candidate dimension {candidates}")]
    DimensionMismatch {
        /// Dimension of the query set.
        queries: usize,
        /// Dimension of the candidate set.
        candidates: usize,
    },

    /// Returned when the worker pool cannot be built.
    #[error("failed to build thread pool: {reason}")]
    ThreadPool {
        /// Description of the failure.
        reason: String,
    },
}

impl SearchError {
    /// Whether the error was a configuration problem or a runtime failure.
    pub fn class(&self) -> ErrorClass {
        match self {
            SearchError::ThreadPool { .. } => ErrorClass::Runtime,
            SearchError::Ucb(_)
            | SearchError::Point(_)
            | SearchError::QueryOutOfRange { .. }
            | SearchError::DimensionMismatch { .. } => ErrorClass::Config,
        }
    }
}
