//! Per-run reports handed to callers and writers.

use banditnn_ucb::{Arm, Phase, PhaseTimer, RunState, RunStatus, UcbConfig};

use crate::verify::{Verification, brute_force, local_true_order, window_true_means};

/// Parameters echoed into every report.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    /// Number of candidate points.
    pub n: usize,
    /// Point dimension.
    pub d: usize,
    /// Number of arms identified.
    pub k: usize,
    /// Target error probability.
    pub delta: f64,
    /// Forced initial pulls per arm.
    pub initial_pulls: usize,
    /// Samples per pull.
    pub sample_size: usize,
}

impl RunParams {
    pub(crate) fn new(n: usize, d: usize, config: &UcbConfig) -> Self {
        Self {
            n,
            d,
            k: config.k(),
            delta: config.delta(),
            initial_pulls: config.initial_pulls(),
            sample_size: config.sample_size(),
        }
    }
}

/// One arm of the reporting window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowEntry {
    /// Candidate index.
    pub id: usize,
    /// Final estimate.
    pub estimate: f64,
    /// Final lower bound.
    pub lcb: f64,
    /// Final upper bound.
    pub ucb: f64,
    /// Pulls spent.
    pub pulls: u64,
    /// Exact mean.
    pub true_mean: f64,
}

/// Everything one engine run produced, in caller-facing form.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Echoed parameters.
    pub params: RunParams,
    /// How the adaptive phase ended.
    pub status: RunStatus,
    /// Total pulls across arms.
    pub global_pulls: u64,
    /// Adaptive rounds run.
    pub rounds: u64,
    /// Pooled per-pull standard deviation.
    pub sigma: f64,
    /// Average pulls per arm.
    pub average_pulls: f64,
    /// Phase durations.
    pub timer: PhaseTimer,
    /// The top-k ids, best first.
    pub answer: Vec<usize>,
    /// The reporting window, `k × (1 + margin_factor)` arms in ranked order.
    pub window: Vec<WindowEntry>,
    /// Local true order of the window (see [`local_true_order`]).
    pub position: Vec<usize>,
    /// Pulls per candidate index; `None` for an excluded self candidate.
    pub pulls_by_candidate: Vec<Option<u64>>,
    /// Final rank per candidate index; `None` for an excluded self candidate.
    pub rank_by_candidate: Vec<Option<usize>>,
    /// Brute-force check, when enabled.
    pub verification: Option<Verification>,
}

impl RunSummary {
    /// Builds the summary from a finished run, running brute-force
    /// verification (timed as [`Phase::Brute`]) when `verify` is set.
    pub(crate) fn from_state<A: Arm + Sync>(
        state: &RunState<A>,
        params: RunParams,
        n_candidates: usize,
        window: usize,
        verify: bool,
        mut timer: PhaseTimer,
    ) -> Self {
        let outcome = state.outcome();
        let answer = outcome.top_ids(params.k);

        let true_means = window_true_means(state, window);
        let position = local_true_order(&true_means);
        let window = outcome
            .top(window)
            .iter()
            .zip(&true_means)
            .map(|(arm, &true_mean)| WindowEntry {
                id: arm.id,
                estimate: arm.estimate,
                lcb: arm.lcb,
                ucb: arm.ucb,
                pulls: arm.pulls,
                true_mean,
            })
            .collect();

        let mut pulls_by_candidate = vec![None; n_candidates];
        let mut rank_by_candidate = vec![None; n_candidates];
        for (rank, arm) in outcome.arms().iter().enumerate() {
            pulls_by_candidate[arm.id] = Some(arm.pulls);
            rank_by_candidate[arm.id] = Some(rank);
        }

        let verification = verify.then(|| timer.measure(Phase::Brute, || brute_force(state, &answer)));

        Self {
            params,
            status: outcome.status(),
            global_pulls: outcome.global_pulls(),
            rounds: outcome.rounds(),
            sigma: outcome.sigma(),
            average_pulls: outcome.average_pulls(),
            timer,
            answer,
            window,
            position,
            pulls_by_candidate,
            rank_by_candidate,
            verification,
        }
    }

    /// Ids of the reporting window in ranked order.
    pub fn window_ids(&self) -> Vec<usize> {
        self.window.iter().map(|w| w.id).collect()
    }

    /// Verification verdict, if verification ran.
    pub fn verdict(&self) -> Option<bool> {
        self.verification.as_ref().map(|v| v.verdict)
    }
}

/// Report for one KNN query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryReport {
    /// Query index.
    pub query: usize,
    /// Run results.
    pub summary: RunSummary,
}

/// Report for one medoid search.
#[derive(Debug, Clone, PartialEq)]
pub struct MedoidReport {
    /// Run results.
    pub summary: RunSummary,
    /// Dense-equivalent distance evaluations per arm:
    /// `global_pulls · sample_size / n · mean_sparsity`.
    ///
    /// Every medoid sample is one full distance, and a full distance between
    /// sparse points touches about `mean_sparsity · d` coordinates, so the
    /// sparsity factor converts sparse work into dense distances.
    pub distance_evaluations: f64,
}
