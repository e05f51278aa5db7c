//! Exact checks against the adaptive answer.

use banditnn_stats::argsort;
use banditnn_ucb::{Arm, RunState};
use rayon::prelude::*;

/// Result of brute-force verification.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    /// The exact top-k ids, best first.
    pub exact_top: Vec<usize>,
    /// `true` when the adaptive top-k equals `exact_top` position by position.
    pub verdict: bool,
}

/// True means of the first `window` ranked arms, in ranked order.
pub fn window_true_means<A: Arm>(state: &RunState<A>, window: usize) -> Vec<f64> {
    state.ranked().take(window).map(Arm::true_mean).collect()
}

/// Local true order of a window: `order[i]` is the window slot holding the
/// `i`-th smallest true mean.
pub fn local_true_order(true_means: &[f64]) -> Vec<usize> {
    argsort(true_means)
}

/// Computes every arm's exact mean and compares the exact top-k with `answer`.
///
/// Costs one full evaluation per arm.
pub fn brute_force<A: Arm + Sync>(state: &RunState<A>, answer: &[usize]) -> Verification {
    let arms = state.arms();
    let means: Vec<f64> = arms.par_iter().map(Arm::true_mean).collect();
    let exact_top: Vec<usize> = argsort(&means)
        .into_iter()
        .take(answer.len())
        .map(|i| arms[i].id())
        .collect();
    let verdict = exact_top == answer;
    Verification { exact_top, verdict }
}
