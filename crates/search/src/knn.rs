//! Adaptive k-nearest-neighbour search.

use banditnn_point::{Point, PointSet};
use banditnn_ucb::{CancelToken, KnnArm, Phase, PhaseTimer, UcbEngine, UcbError, derive_seed};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::report::{QueryReport, RunParams, RunSummary};

/// Where candidate neighbours come from.
#[derive(Debug)]
pub enum Candidates<'a, P> {
    /// Queries and candidates are the same set; a query is never its own
    /// neighbour.
    SameSet,
    /// A separate candidate set of the same dimension.
    Other(&'a PointSet<P>),
}

/// Finds the k nearest candidates of query points by adaptive sampling.
///
/// Every query gets a fresh arm set and a fresh engine run; queries share
/// only the immutable point data, so they can run concurrently.
#[derive(Debug)]
pub struct KnnSearch<'a, P> {
    queries: &'a PointSet<P>,
    candidates: &'a PointSet<P>,
    same_set: bool,
    config: SearchConfig,
    engine: UcbEngine,
}

impl<'a, P: Point> KnnSearch<'a, P> {
    /// Creates a search over `queries`.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Ucb`] if the engine parameters are invalid.
    /// - [`SearchError::DimensionMismatch`] if the candidate set has another
    ///   dimension.
    pub fn new(
        queries: &'a PointSet<P>,
        candidates: Candidates<'a, P>,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        let engine = UcbEngine::new(config.ucb().clone())?;
        let (candidates, same_set) = match candidates {
            Candidates::SameSet => (queries, true),
            Candidates::Other(set) => (set, false),
        };
        if candidates.dim() != queries.dim() {
            return Err(SearchError::DimensionMismatch {
                queries: queries.dim(),
                candidates: candidates.dim(),
            });
        }
        Ok(Self {
            queries,
            candidates,
            same_set,
            config,
            engine,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Number of arms a query runs over.
    pub fn n_arms(&self) -> usize {
        if self.same_set {
            self.candidates.len() - 1
        } else {
            self.candidates.len()
        }
    }

    /// Runs one query.
    ///
    /// # Errors
    ///
    /// - [`SearchError::QueryOutOfRange`] for an invalid `index`.
    /// - [`SearchError::Ucb`] if the arm set does not fit the configuration.
    pub fn query(&self, index: usize, cancel: &CancelToken) -> Result<QueryReport, SearchError> {
        if index >= self.queries.len() {
            return Err(SearchError::QueryOutOfRange {
                index,
                len: self.queries.len(),
            });
        }
        let query = &self.queries[index];
        let metric = self.config.metric();
        let query_seed = derive_seed(self.config.seed(), index as u64);
        let arms: Vec<KnnArm<'_, P>> = (0..self.candidates.len())
            .filter(|&id| !(self.same_set && id == index))
            .map(|id| {
                KnnArm::new(
                    id,
                    query,
                    &self.candidates[id],
                    metric,
                    derive_seed(query_seed, id as u64),
                )
            })
            .collect();

        let mut timer = PhaseTimer::new();
        let mut state = timer.measure(Phase::Init, || {
            let mut state = self.engine.start(arms)?;
            self.engine.initialise(&mut state);
            Ok::<_, UcbError>(state)
        })?;
        timer.measure(Phase::Run, || self.engine.run(&mut state, cancel));
        timer.measure(Phase::Extract, || self.engine.extract(&mut state));

        let ucb = self.config.ucb();
        let params = RunParams::new(self.candidates.len(), self.candidates.dim(), ucb);
        let window = ucb.report_len().min(state.n_arms());
        let summary = RunSummary::from_state(
            &state,
            params,
            self.candidates.len(),
            window,
            self.config.verify(),
            timer,
        );
        debug!(
            query = index,
            status = %summary.status,
            average_pulls = summary.average_pulls,
            "query done"
        );
        Ok(QueryReport {
            query: index,
            summary,
        })
    }

    /// Runs `indices` in parallel on a pool of `threads` workers.
    ///
    /// All indices are validated before any query starts. Queries not yet
    /// started when `cancel` fires are skipped, so the result may be shorter
    /// than `indices`; it keeps the order of `indices` otherwise.
    pub fn run(&self, indices: &[usize], cancel: &CancelToken) -> Result<Vec<QueryReport>, SearchError> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.queries.len()) {
            return Err(SearchError::QueryOutOfRange {
                index,
                len: self.queries.len(),
            });
        }
        let pool = self.config.thread_pool()?;
        let reports: Vec<QueryReport> = pool.install(|| {
            indices
                .par_iter()
                .filter(|_| !cancel.is_cancelled())
                .map(|&i| self.query(i, cancel))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let confirmed = reports
            .iter()
            .filter(|r| r.summary.status.is_confirmed())
            .count();
        info!(
            queries = reports.len(),
            confirmed,
            threads = pool.current_num_threads(),
            "knn search done"
        );
        Ok(reports)
    }

    /// Runs every query point.
    pub fn run_all(&self, cancel: &CancelToken) -> Result<Vec<QueryReport>, SearchError> {
        let indices: Vec<usize> = (0..self.queries.len()).collect();
        self.run(&indices, cancel)
    }
}
