//! Configuration shared by KNN and medoid searches.

use banditnn_point::Metric;
use banditnn_ucb::UcbConfig;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::SearchError;

/// Search-level configuration: the engine parameters plus everything the
/// engine does not need to know about.
///
/// # Example
///
/// ```
/// use banditnn_point::Metric;
/// use banditnn_search::SearchConfig;
/// use banditnn_ucb::UcbConfig;
///
/// let config = SearchConfig::new(UcbConfig::new(3))
///     .with_metric(Metric::Manhattan)
///     .with_seed(7)
///     .with_verify(true);
/// assert_eq!(config.ucb().k(), 3);
/// assert!(config.verify());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    ucb: UcbConfig,
    /// Distance metric (default Euclidean).
    metric: Metric,
    /// Base seed; per-query and per-arm seeds derive from it.
    seed: u64,
    /// Run brute-force verification after each search.
    verify: bool,
    /// Worker threads; 0 lets rayon decide.
    threads: usize,
}

impl SearchConfig {
    /// Creates a configuration around the given engine parameters.
    pub fn new(ucb: UcbConfig) -> Self {
        Self {
            ucb,
            metric: Metric::Euclidean,
            seed: 0,
            verify: false,
            threads: 0,
        }
    }

    /// Sets the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables brute-force verification.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Sets the number of worker threads (0 = rayon default).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Returns the engine parameters.
    pub fn ucb(&self) -> &UcbConfig {
        &self.ucb
    }

    /// Returns the metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the base seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns whether verification is enabled.
    pub fn verify(&self) -> bool {
        self.verify
    }

    /// Returns the worker thread count.
    pub fn threads(&self) -> usize {
        self.threads
    }

    pub(crate) fn thread_pool(&self) -> Result<ThreadPool, SearchError> {
        ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| SearchError::ThreadPool {
                reason: e.to_string(),
            })
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(UcbConfig::default())
    }
}
