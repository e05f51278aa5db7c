//! The confidence-bound top-k engine.
//!
//! A run goes through four phases:
//!
//! 1. [`UcbEngine::start`] validates the arm set and builds a fresh [`RunState`].
//! 2. [`UcbEngine::initialise`] pulls every arm `initial_pulls` times.
//! 3. [`UcbEngine::run`] repeats rounds until the top `k` arms are separated
//!    from the rest, the pull budget runs out, or the run is cancelled.
//! 4. [`UcbEngine::extract`] optionally spends extra pulls on the reporting
//!    window so its ranking is sharper.
//!
//! Each round ranks the arms, takes the first `k` as the top set T, and looks
//! at the active arm in T with the highest UCB and the active arm outside T
//! with the lowest LCB. If their intervals are disjoint the run is confirmed.
//! Otherwise arms that are already clear of the cut are resolved and the two
//! boundary arms get one more pull each.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use crate::arm::Arm;
use crate::cancel::CancelToken;
use crate::config::UcbConfig;
use crate::error::UcbError;
use crate::outcome::{ArmStatus, ArmSummary, RunStatus, UcbOutcome};

/// Sample size from which the two boundary pulls of a round run in parallel.
pub const PARALLEL_PULL_MIN: usize = 1024;

/// Mutable state of one run. Built by [`UcbEngine::start`], never reused.
#[derive(Debug)]
pub struct RunState<A> {
    arms: Vec<A>,
    status: Vec<ArmStatus>,
    /// Arm positions in ranked order.
    order: Vec<usize>,
    k: usize,
    budget: u64,
    global_pulls: u64,
    rounds: u64,
    /// Pooled sum of squared deviations of per-pull means.
    sum_m2: f64,
    /// Pooled degrees of freedom, `Σ (pulls − 1)`.
    dof: u64,
    sigma: f64,
    run_status: Option<RunStatus>,
}

impl<A: Arm> RunState<A> {
    /// The arms, in the order they were supplied.
    pub fn arms(&self) -> &[A] {
        &self.arms
    }

    /// Resolution state of the arm at `position` (supply order).
    pub fn arm_status(&self, position: usize) -> ArmStatus {
        self.status[position]
    }

    /// Number of arms.
    pub fn n_arms(&self) -> usize {
        self.arms.len()
    }

    /// Number of arms to identify.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Resolved global pull cap.
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Pulls spent so far.
    pub fn global_pulls(&self) -> u64 {
        self.global_pulls
    }

    /// Adaptive rounds run so far.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Pooled per-pull standard deviation.
    ///
    /// Infinite until some arm has been pulled twice.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// How the adaptive phase ended, once it has.
    pub fn run_status(&self) -> Option<RunStatus> {
        self.run_status
    }

    /// Arms in current ranked order.
    pub fn ranked(&self) -> impl Iterator<Item = &A> + '_ {
        self.order.iter().map(|&i| &self.arms[i])
    }

    /// Arm ids in current ranked order.
    pub fn ranked_ids(&self) -> Vec<usize> {
        self.ranked().map(Arm::id).collect()
    }

    /// Snapshot of the run. Reports [`RunStatus::Unresolved`] if the
    /// adaptive phase has not run yet.
    pub fn outcome(&self) -> UcbOutcome {
        let arms = self
            .order
            .iter()
            .map(|&i| {
                let arm = &self.arms[i];
                let stats = arm.stats();
                ArmSummary {
                    id: arm.id(),
                    pulls: stats.pulls(),
                    estimate: stats.estimate(),
                    lcb: stats.lcb(),
                    ucb: stats.ucb(),
                    status: self.status[i],
                }
            })
            .collect();
        UcbOutcome::new(
            arms,
            self.global_pulls,
            self.rounds,
            self.sigma,
            self.run_status.unwrap_or(RunStatus::Unresolved),
        )
    }

    fn refresh_pooled(&mut self) {
        let (sum_m2, dof) = self
            .arms
            .iter()
            .map(pooled_share)
            .fold((0.0, 0), |(m, d), (am, ad)| (m + am, d + ad));
        self.sum_m2 = sum_m2;
        self.dof = dof;
        self.sigma = pooled_sigma(sum_m2, dof);
    }

    fn update_bounds(&mut self, config: &UcbConfig) {
        let n_arms = self.arms.len();
        let sigma = self.sigma;
        for arm in &mut self.arms {
            arm.update_bound(sigma, config.delta(), n_arms, config.sample_size());
        }
    }

    /// Accepted arms first, then active, then rejected; each group by
    /// ascending estimate, ties by id.
    fn rank(&mut self) {
        let arms = &self.arms;
        let status = &self.status;
        self.order.sort_by(|&a, &b| {
            group(status[a])
                .cmp(&group(status[b]))
                .then_with(|| {
                    arms[a]
                        .stats()
                        .estimate()
                        .total_cmp(&arms[b].stats().estimate())
                })
                .then_with(|| arms[a].id().cmp(&arms[b].id()))
        });
    }

    fn cut(&self) -> Cut {
        let mut cut = Cut {
            ucb_cut: f64::NEG_INFINITY,
            lcb_cut: f64::INFINITY,
            upper: None,
            lower: None,
        };
        let (top, rest) = self.order.split_at(self.k);
        for &i in top {
            let ucb = self.arms[i].stats().ucb();
            if self.status[i] == ArmStatus::Active && (cut.upper.is_none() || ucb > cut.ucb_cut) {
                cut.ucb_cut = ucb;
                cut.upper = Some(i);
            }
        }
        for &i in rest {
            let lcb = self.arms[i].stats().lcb();
            if self.status[i] == ArmStatus::Active && (cut.lower.is_none() || lcb < cut.lcb_cut) {
                cut.lcb_cut = lcb;
                cut.lower = Some(i);
            }
        }
        cut
    }

    fn separated(&self, cut: &Cut) -> bool {
        let (Some(upper), Some(lower)) = (cut.upper, cut.lower) else {
            return true;
        };
        if cut.ucb_cut < cut.lcb_cut {
            return true;
        }
        cut.ucb_cut <= cut.lcb_cut && self.arms[upper].is_exhausted() && self.arms[lower].is_exhausted()
    }

    /// Resolves arms already clear of the cut. Returns (accepted, rejected).
    fn resolve(&mut self, cut: &Cut) -> (usize, usize) {
        let mut accepted = 0;
        let mut rejected = 0;
        for (pos, &i) in self.order.iter().enumerate() {
            if self.status[i] != ArmStatus::Active {
                continue;
            }
            let stats = self.arms[i].stats();
            if pos < self.k && stats.ucb() < cut.lcb_cut {
                self.status[i] = ArmStatus::Accepted;
                accepted += 1;
            } else if pos >= self.k && stats.lcb() > cut.ucb_cut {
                self.status[i] = ArmStatus::Rejected;
                rejected += 1;
            }
        }
        (accepted, rejected)
    }

    fn targets(&self, cut: &Cut) -> Vec<usize> {
        [cut.upper, cut.lower]
            .into_iter()
            .flatten()
            .filter(|&i| !self.arms[i].is_exhausted())
            .collect()
    }

    /// Pulls each target once and folds the change into the pooled variance.
    fn pull_targets(&mut self, targets: &[usize], sample_size: usize) {
        let (old_m2, old_dof) = self.shares(targets);
        let pulled = match *targets {
            [a, b] if sample_size >= PARALLEL_PULL_MIN => {
                let (x, y) = pull_pair(&mut self.arms, a, b, sample_size);
                usize::from(x > 0) + usize::from(y > 0)
            }
            _ => targets
                .iter()
                .filter(|&&i| self.arms[i].pull(sample_size) > 0)
                .count(),
        };
        let (new_m2, new_dof) = self.shares(targets);
        self.global_pulls += pulled as u64;
        self.sum_m2 += new_m2 - old_m2;
        self.dof = self.dof + new_dof - old_dof;
        self.sigma = pooled_sigma(self.sum_m2, self.dof);
    }

    fn shares(&self, targets: &[usize]) -> (f64, u64) {
        targets
            .iter()
            .map(|&i| pooled_share(&self.arms[i]))
            .fold((0.0, 0), |(m, d), (am, ad)| (m + am, d + ad))
    }
}

/// Boundary of the current top set.
#[derive(Debug, Clone, Copy)]
struct Cut {
    ucb_cut: f64,
    lcb_cut: f64,
    /// Active arm in T with the highest UCB.
    upper: Option<usize>,
    /// Active arm outside T with the lowest LCB.
    lower: Option<usize>,
}

fn group(status: ArmStatus) -> u8 {
    match status {
        ArmStatus::Accepted => 0,
        ArmStatus::Active => 1,
        ArmStatus::Rejected => 2,
    }
}

fn pooled_share<A: Arm>(arm: &A) -> (f64, u64) {
    let stats = arm.stats();
    (stats.m2(), stats.pulls().saturating_sub(1))
}

fn pooled_sigma(sum_m2: f64, dof: u64) -> f64 {
    if dof == 0 {
        return f64::INFINITY;
    }
    (sum_m2.max(0.0) / dof as f64).sqrt()
}

/// Pulls two distinct arms on separate threads.
fn pull_pair<A: Arm>(arms: &mut [A], a: usize, b: usize, sample_size: usize) -> (usize, usize) {
    debug_assert_ne!(a, b);
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let (left, right) = arms.split_at_mut(hi);
    let (lo_arm, hi_arm) = (&mut left[lo], &mut right[0]);
    let (x, y) = rayon::join(|| lo_arm.pull(sample_size), || hi_arm.pull(sample_size));
    match a.cmp(&b) {
        Ordering::Less => (x, y),
        _ => (y, x),
    }
}

/// Runs confidence-bound top-k identification over a set of arms.
///
/// The engine is immutable and holds only the configuration; all run state
/// lives in the [`RunState`] it hands out, so one engine can drive many
/// independent runs, including concurrently.
#[derive(Debug, Clone)]
pub struct UcbEngine {
    config: UcbConfig,
}

impl UcbEngine {
    /// Creates an engine after validating the arm-independent parameters.
    pub fn new(config: UcbConfig) -> Result<Self, UcbError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &UcbConfig {
        &self.config
    }

    /// Validates `arms` against the configuration and builds the run state.
    ///
    /// # Errors
    ///
    /// - [`UcbError::NoArms`] if `arms` is empty.
    /// - [`UcbError::InvalidK`] unless `k < arms.len()`.
    /// - [`UcbError::InvalidInitialPulls`] if `initial_pulls` is zero or more
    ///   than the smallest arm can make at the configured sample size.
    /// - [`UcbError::BudgetBelowInit`] if the budget cannot cover the
    ///   initial phase.
    pub fn start<A: Arm>(&self, arms: Vec<A>) -> Result<RunState<A>, UcbError> {
        let n = arms.len();
        if n == 0 {
            return Err(UcbError::NoArms);
        }
        let k = self.config.k();
        if k >= n {
            return Err(UcbError::InvalidK { k, n_arms: n });
        }
        let sample_size = self.config.sample_size();
        let max = arms
            .iter()
            .map(|a| a.max_pulls(sample_size))
            .min()
            .unwrap_or(0);
        let initial = self.config.initial_pulls();
        if initial == 0 || initial > max {
            return Err(UcbError::InvalidInitialPulls { initial, max });
        }
        let budget = self.config.budget().resolve(n);
        let required = (n as u64).saturating_mul(initial as u64);
        if budget < required {
            return Err(UcbError::BudgetBelowInit { budget, required });
        }

        Ok(RunState {
            arms,
            status: vec![ArmStatus::Active; n],
            order: (0..n).collect(),
            k,
            budget,
            global_pulls: 0,
            rounds: 0,
            sum_m2: 0.0,
            dof: 0,
            sigma: f64::INFINITY,
            run_status: None,
        })
    }

    /// Pulls every arm `initial_pulls` times, in parallel across arms.
    pub fn initialise<A: Arm>(&self, state: &mut RunState<A>) {
        let sample_size = self.config.sample_size();
        let initial = self.config.initial_pulls();
        let pulls: u64 = state
            .arms
            .par_iter_mut()
            .map(|arm| (0..initial).filter(|_| arm.pull(sample_size) > 0).count() as u64)
            .sum();
        state.global_pulls += pulls;
        state.refresh_pooled();
        state.update_bounds(&self.config);
        state.rank();
        info!(
            arms = state.arms.len(),
            pulls,
            sigma = state.sigma,
            "initial pulls done"
        );
    }

    /// Runs adaptive rounds until the run terminates.
    ///
    /// `cancel` is checked between rounds. The returned status is also kept
    /// in the state and carried into [`RunState::outcome`].
    pub fn run<A: Arm>(&self, state: &mut RunState<A>, cancel: &CancelToken) -> RunStatus {
        let sample_size = self.config.sample_size();
        let status = loop {
            if cancel.is_cancelled() {
                break RunStatus::Cancelled;
            }
            let cut = state.cut();
            if state.separated(&cut) {
                break RunStatus::Confirmed;
            }
            let (accepted, rejected) = state.resolve(&cut);
            if accepted + rejected > 0 {
                debug!(
                    round = state.rounds,
                    accepted,
                    rejected,
                    ucb_cut = cut.ucb_cut,
                    lcb_cut = cut.lcb_cut,
                    "arms resolved"
                );
            }
            let mut targets = state.targets(&cut);
            if targets.is_empty() {
                break RunStatus::Unresolved;
            }
            let room = state.budget - state.global_pulls;
            if room == 0 {
                break RunStatus::BudgetExhausted;
            }
            targets.truncate(usize::try_from(room).unwrap_or(usize::MAX));
            state.pull_targets(&targets, sample_size);
            state.rounds += 1;
            state.update_bounds(&self.config);
            state.rank();
            trace!(
                round = state.rounds,
                pulls = state.global_pulls,
                sigma = state.sigma,
                "round done"
            );
        };
        state.run_status = Some(status);

        match status {
            RunStatus::Confirmed => info!(
                rounds = state.rounds,
                pulls = state.global_pulls,
                "top set confirmed"
            ),
            RunStatus::BudgetExhausted => warn!(
                rounds = state.rounds,
                budget = state.budget,
                "pull budget exhausted before separation, ranking is best-effort"
            ),
            RunStatus::Cancelled => warn!(rounds = state.rounds, "run cancelled"),
            RunStatus::Unresolved => warn!(
                rounds = state.rounds,
                "no pullable arm straddles the cut, ranking is best-effort"
            ),
        }
        status
    }

    /// Spends `extraction_pulls` extra pulls on each arm of the reporting
    /// window, within the remaining budget, then re-ranks.
    pub fn extract<A: Arm>(&self, state: &mut RunState<A>) {
        let extra = self.config.extraction_pulls();
        if extra == 0 {
            return;
        }
        let sample_size = self.config.sample_size();
        let window = self.config.report_len().min(state.arms.len());
        let mut pulls = 0u64;
        'window: for pos in 0..window {
            let i = state.order[pos];
            for _ in 0..extra {
                if state.global_pulls >= state.budget {
                    warn!(budget = state.budget, "pull budget reached during extraction");
                    break 'window;
                }
                if state.arms[i].pull(sample_size) == 0 {
                    break;
                }
                state.global_pulls += 1;
                pulls += 1;
            }
        }
        state.refresh_pooled();
        state.update_bounds(&self.config);
        state.rank();
        info!(window, pulls, "extraction done");
    }

    /// Runs every phase in order and returns the finished state.
    pub fn solve<A: Arm>(&self, arms: Vec<A>, cancel: &CancelToken) -> Result<RunState<A>, UcbError> {
        let mut state = self.start(arms)?;
        self.initialise(&mut state);
        self.run(&mut state, cancel);
        self.extract(&mut state);
        Ok(state)
    }
}
