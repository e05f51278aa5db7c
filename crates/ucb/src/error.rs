//! Error types for the banditnn-ucb crate.

/// Configuration error detected before any sampling begins.
///
/// The engine has no runtime failure modes: budget exhaustion and
/// cancellation are reported through [`RunStatus`](crate::RunStatus).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UcbError {
    /// Returned when no arms are supplied.
    #[error("no arms to evaluate")]
    NoArms,

    /// Returned when k is zero or not smaller than the number of arms.
    #[error("k must satisfy 1 <= k < {n_arms}, got {k}")]
    InvalidK {
        /// The invalid k value.
        k: usize,
        /// Number of arms available.
        n_arms: usize,
    },

    /// Returned when delta is not in the open interval (0, 1).
    #[error("delta must be in (0, 1), got {delta}")]
    InvalidDelta {
        /// The invalid delta value.
        delta: f64,
    },

    /// Returned when the per-pull sample size is zero.
    #[error("sample size must be >= 1")]
    InvalidSampleSize,

    /// Returned when initial pulls are zero or exceed the distinct pulls an arm can make.
    #[error("initial pulls must satisfy 1 <= initial <= {max}, got {initial}")]
    InvalidInitialPulls {
        /// Requested initial pulls per arm.
        initial: usize,
        /// Maximum distinct pulls available to the smallest arm.
        max: usize,
    },

    /// Returned when the pull budget is zero.
    #[error("pull budget must be >= 1")]
    InvalidBudget,

    /// Returned when the pull budget cannot cover the initial phase.
    #[error("pull budget {budget} is smaller than the {required} initial pulls")]
    BudgetBelowInit {
        /// Resolved global pull cap.
        budget: u64,
        /// Pulls needed by the initial phase.
        required: u64,
    },
}
