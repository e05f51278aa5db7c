//! Configuration for a confidence-bound top-k run.

use crate::error::UcbError;

/// Global cap on the number of pulls a run may spend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PullBudget {
    /// `factor × n_arms` pulls.
    PerArm(u64),
    /// A fixed number of pulls regardless of arm count.
    Total(u64),
}

impl PullBudget {
    /// Resolves the cap for a run over `n_arms` arms.
    pub fn resolve(self, n_arms: usize) -> u64 {
        match self {
            PullBudget::PerArm(factor) => factor.saturating_mul(n_arms as u64),
            PullBudget::Total(total) => total,
        }
    }
}

impl Default for PullBudget {
    fn default() -> Self {
        PullBudget::PerArm(20_000)
    }
}

/// Immutable configuration for one engine run.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use banditnn_ucb::{PullBudget, UcbConfig};
///
/// let config = UcbConfig::new(5)
///     .with_delta(0.05)
///     .with_initial_pulls(8)
///     .with_sample_size(4)
///     .with_budget(PullBudget::Total(100_000));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.report_len(), 25);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UcbConfig {
    /// Number of arms to identify.
    k: usize,
    /// Target error probability.
    delta: f64,
    /// Forced pulls per arm before any elimination.
    initial_pulls: usize,
    /// Dimensions (KNN) or points (Medoid) sampled per pull.
    sample_size: usize,
    /// Global pull cap.
    budget: PullBudget,
    /// Reporting window is `k × (1 + margin_factor)`.
    margin_factor: usize,
    /// Extra forced pulls per arm in the reporting window after termination.
    extraction_pulls: usize,
}

impl UcbConfig {
    /// Creates a new configuration with the given k.
    ///
    /// Defaults: `delta = 0.01`, `initial_pulls = 8`, `sample_size = 16`,
    /// `budget = PerArm(20000)`, `margin_factor = 4`, `extraction_pulls = 0`.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            delta: 0.01,
            initial_pulls: 8,
            sample_size: 16,
            budget: PullBudget::default(),
            margin_factor: 4,
            extraction_pulls: 0,
        }
    }

    /// Sets the target error probability.
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Sets the forced initial pulls per arm.
    pub fn with_initial_pulls(mut self, initial_pulls: usize) -> Self {
        self.initial_pulls = initial_pulls;
        self
    }

    /// Sets the per-pull sample size.
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Sets the global pull cap.
    pub fn with_budget(mut self, budget: PullBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the reporting margin as a multiple of k.
    pub fn with_margin_factor(mut self, margin_factor: usize) -> Self {
        self.margin_factor = margin_factor;
        self
    }

    /// Sets the extra forced pulls for arms in the reporting window.
    pub fn with_extraction_pulls(mut self, extraction_pulls: usize) -> Self {
        self.extraction_pulls = extraction_pulls;
        self
    }

    /// Returns k.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns delta.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Returns the initial pulls per arm.
    pub fn initial_pulls(&self) -> usize {
        self.initial_pulls
    }

    /// Returns the per-pull sample size.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Returns the budget policy.
    pub fn budget(&self) -> PullBudget {
        self.budget
    }

    /// Returns the margin factor.
    pub fn margin_factor(&self) -> usize {
        self.margin_factor
    }

    /// Returns the extraction pulls per window arm.
    pub fn extraction_pulls(&self) -> usize {
        self.extraction_pulls
    }

    /// Length of the reporting window, `k × (1 + margin_factor)`.
    ///
    /// Callers clamp this to the number of arms.
    pub fn report_len(&self) -> usize {
        self.k.saturating_mul(1 + self.margin_factor)
    }

    /// Validates the arm-independent parameters.
    ///
    /// Checks that depend on the arm set (k against arm count, initial pulls
    /// against distinct pulls, budget against the initial phase) happen in
    /// [`UcbEngine::start`](crate::UcbEngine::start).
    pub fn validate(&self) -> Result<(), UcbError> {
        if self.k < 1 {
            return Err(UcbError::InvalidK {
                k: self.k,
                n_arms: 0,
            });
        }
        if !(self.delta.is_finite() && self.delta > 0.0 && self.delta < 1.0) {
            return Err(UcbError::InvalidDelta { delta: self.delta });
        }
        if self.sample_size < 1 {
            return Err(UcbError::InvalidSampleSize);
        }
        match self.budget {
            PullBudget::PerArm(0) | PullBudget::Total(0) => Err(UcbError::InvalidBudget),
            _ => Ok(()),
        }
    }
}

impl Default for UcbConfig {
    fn default() -> Self {
        Self::new(1)
    }
}
