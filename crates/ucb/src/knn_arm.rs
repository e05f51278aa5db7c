//! Arm for one candidate against a fixed query point.

use banditnn_point::{Metric, Point};

use crate::arm::{Arm, ArmStats, Draws};

/// Estimates the mean per-dimension contribution between `query` and `candidate`.
///
/// Each pull samples fresh dimensions without replacement, so after `dim`
/// sampled dimensions the estimate equals `contribution_sum / dim` exactly.
#[derive(Debug, Clone)]
pub struct KnnArm<'a, P> {
    id: usize,
    query: &'a P,
    candidate: &'a P,
    metric: Metric,
    draws: Draws,
    stats: ArmStats,
}

impl<'a, P: Point> KnnArm<'a, P> {
    /// Creates an arm for candidate `id`.
    ///
    /// `seed` should be unique per (query, candidate) pair; see
    /// [`derive_seed`](crate::derive_seed).
    pub fn new(id: usize, query: &'a P, candidate: &'a P, metric: Metric, seed: u64) -> Self {
        debug_assert_eq!(query.dim(), candidate.dim());
        Self {
            id,
            query,
            candidate,
            metric,
            draws: Draws::new(candidate.dim(), seed),
            stats: ArmStats::default(),
        }
    }

    /// The candidate point.
    pub fn candidate(&self) -> &'a P {
        self.candidate
    }
}

impl<P: Point> Arm for KnnArm<'_, P> {
    fn id(&self) -> usize {
        self.id
    }

    fn population(&self) -> usize {
        self.candidate.dim()
    }

    fn pull(&mut self, sample_size: usize) -> usize {
        let dims = self.draws.next_batch(sample_size);
        let count = dims.len();
        if count == 0 {
            return 0;
        }
        let sum = self.query.partial_distance(self.candidate, dims, self.metric);
        self.stats.record(sum, count);
        count
    }

    fn stats(&self) -> &ArmStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut ArmStats {
        &mut self.stats
    }

    fn true_mean(&self) -> f64 {
        self.query.contribution_sum(self.candidate, self.metric) / self.candidate.dim() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use banditnn_point::DensePoint;

    #[test]
    fn test_full_sample_is_exact() {
        let q = DensePoint::new(vec![0.0, 0.0, 0.0, 0.0]);
        let c = DensePoint::new(vec![1.0, 2.0, 3.0, 4.0]);
        let mut arm = KnnArm::new(7, &q, &c, Metric::SquaredEuclidean, 1);
        assert_eq!(arm.pull(4), 4);
        assert!(arm.is_exhausted());
        assert_abs_diff_eq!(arm.stats().estimate(), 30.0 / 4.0);
        assert_abs_diff_eq!(arm.stats().estimate(), arm.true_mean());
        assert_eq!(arm.id(), 7);
    }

    #[test]
    fn test_exhausts_then_stops() {
        let q = DensePoint::new(vec![0.0; 5]);
        let c = DensePoint::new(vec![1.0, 1.0, 2.0, 2.0, 3.0]);
        let mut arm = KnnArm::new(0, &q, &c, Metric::Manhattan, 3);
        assert_eq!(arm.max_pulls(2), 3);
        assert_eq!(arm.pull(2), 2);
        assert_eq!(arm.pull(2), 2);
        assert_eq!(arm.pull(2), 1);
        assert_eq!(arm.pull(2), 0);
        assert_eq!(arm.stats().pulls(), 3);
        assert_abs_diff_eq!(arm.stats().estimate(), 9.0 / 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bound_collapses_after_exhaustion() {
        let q = DensePoint::new(vec![0.0; 3]);
        let c = DensePoint::new(vec![1.0, 5.0, 2.0]);
        let mut arm = KnnArm::new(0, &q, &c, Metric::SquaredEuclidean, 5);
        for _ in 0..3 {
            arm.pull(1);
        }
        arm.update_bound(10.0, 0.01, 4, 1);
        assert_eq!(arm.stats().lcb(), arm.stats().ucb());
        assert_abs_diff_eq!(arm.stats().lcb(), arm.true_mean(), epsilon = 1e-12);
    }

    #[test]
    fn test_partial_estimate_within_range() {
        let q = DensePoint::new(vec![0.0; 100]);
        let c = DensePoint::new((0..100).map(|i| (i % 4) as f64).collect());
        let mut arm = KnnArm::new(0, &q, &c, Metric::SquaredEuclidean, 11);
        arm.pull(10);
        let est = arm.stats().estimate();
        assert!((0.0..=9.0).contains(&est));
    }
}
