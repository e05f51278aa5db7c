//! Adaptive medoid search.

use banditnn_point::{Point, PointSet};
use banditnn_ucb::{CancelToken, MedoidArm, Phase, PhaseTimer, UcbEngine, derive_seed};
use tracing::info;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::report::{MedoidReport, RunParams, RunSummary};

/// Finds the point(s) with the smallest average distance to all others.
#[derive(Debug)]
pub struct MedoidSearch<'a, P> {
    points: &'a PointSet<P>,
    config: SearchConfig,
    engine: UcbEngine,
}

impl<'a, P: Point> MedoidSearch<'a, P> {
    /// Creates a search over `points`.
    ///
    /// # Errors
    ///
    /// [`SearchError::Ucb`] if the engine parameters are invalid.
    pub fn new(points: &'a PointSet<P>, config: SearchConfig) -> Result<Self, SearchError> {
        let engine = UcbEngine::new(config.ucb().clone())?;
        Ok(Self {
            points,
            config,
            engine,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the search with one arm per point.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Ucb`] if the point set does not fit the configuration
    ///   (for example `k` not smaller than the number of points).
    /// - [`SearchError::ThreadPool`] if the worker pool cannot be built.
    pub fn run(&self, cancel: &CancelToken) -> Result<MedoidReport, SearchError> {
        let metric = self.config.metric();
        let seed = self.config.seed();
        let arms: Vec<MedoidArm<'_, P>> = (0..self.points.len())
            .map(|id| MedoidArm::new(id, self.points, metric, derive_seed(seed, id as u64)))
            .collect();
        // Reject before spending time on the pool.
        let mut state = self.engine.start(arms)?;

        let pool = self.config.thread_pool()?;
        let mut timer = PhaseTimer::new();
        pool.install(|| {
            timer.measure(Phase::Init, || self.engine.initialise(&mut state));
            timer.measure(Phase::Run, || self.engine.run(&mut state, cancel));
            timer.measure(Phase::Extract, || self.engine.extract(&mut state));
        });

        let ucb = self.config.ucb();
        let n = self.points.len();
        let params = RunParams::new(n, self.points.dim(), ucb);
        let window = ucb.report_len().min(n);
        let summary = pool.install(|| {
            RunSummary::from_state(&state, params, n, window, self.config.verify(), timer)
        });

        // full distances per arm, in dense-equivalent units
        let distance_evaluations = summary.global_pulls as f64 * ucb.sample_size() as f64
            / n as f64
            * self.points.mean_sparsity();
        info!(
            medoid = ?summary.answer,
            pulls = summary.global_pulls,
            average_pulls = summary.average_pulls,
            distance_evaluations,
            sigma = summary.sigma,
            status = %summary.status,
            "medoid search done"
        );
        Ok(MedoidReport {
            summary,
            distance_evaluations,
        })
    }
}

