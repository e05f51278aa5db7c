//! Arm for one candidate medoid against the whole point set.

use banditnn_point::{Metric, Point, PointSet};

use crate::arm::{Arm, ArmStats, Draws};

/// Estimates a candidate's average distance to every other point.
///
/// Each pull samples `sample_size` other points without replacement and
/// computes full distances to them. The candidate itself is never sampled.
#[derive(Debug, Clone)]
pub struct MedoidArm<'a, P> {
    id: usize,
    points: &'a PointSet<P>,
    metric: Metric,
    draws: Draws,
    stats: ArmStats,
}

impl<'a, P: Point> MedoidArm<'a, P> {
    /// Creates the arm for candidate `id` of `points`.
    pub fn new(id: usize, points: &'a PointSet<P>, metric: Metric, seed: u64) -> Self {
        debug_assert!(id < points.len());
        Self {
            id,
            points,
            metric,
            draws: Draws::new(points.len() - 1, seed),
            stats: ArmStats::default(),
        }
    }
}

/// Maps a draw in `0..n-1` onto a point index other than `id`.
#[inline]
fn other_index(id: usize, draw: usize) -> usize {
    if draw >= id { draw + 1 } else { draw }
}

impl<P: Point> Arm for MedoidArm<'_, P> {
    fn id(&self) -> usize {
        self.id
    }

    fn population(&self) -> usize {
        self.points.len() - 1
    }

    fn pull(&mut self, sample_size: usize) -> usize {
        let (id, points, metric) = (self.id, self.points, self.metric);
        let draws = self.draws.next_batch(sample_size);
        let count = draws.len();
        if count == 0 {
            return 0;
        }
        let candidate = &points[id];
        let sum: f64 = draws
            .iter()
            .map(|&d| candidate.distance(&points[other_index(id, d)], metric))
            .sum();
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
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let candidate = &self.points[self.id];
        let total: f64 = (0..n)
            .filter(|&j| j != self.id)
            .map(|j| candidate.distance(&self.points[j], self.metric))
            .sum();
        total / (n - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use banditnn_point::DensePoint;

    fn line() -> PointSet<DensePoint> {
        PointSet::from_rows(vec![vec![0.0], vec![1.0], vec![2.0], vec![10.0]]).unwrap()
    }

    #[test]
    fn test_true_mean_excludes_self() {
        let set = line();
        let arm = MedoidArm::new(1, &set, Metric::Euclidean, 0);
        // |1-0| + |1-2| + |1-10| = 11 over 3 others
        assert_abs_diff_eq!(arm.true_mean(), 11.0 / 3.0, epsilon = 1e-12);
        assert_eq!(arm.population(), 3);
    }

    #[test]
    fn test_full_pull_is_exact() {
        let set = line();
        for id in 0..set.len() {
            let mut arm = MedoidArm::new(id, &set, Metric::Euclidean, 42);
            assert_eq!(arm.pull(100), 3);
            assert!(arm.is_exhausted());
            assert_abs_diff_eq!(arm.stats().estimate(), arm.true_mean(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_never_samples_self() {
        // Self-distance is 0; if sampled the single-point estimates would hit 0.
        let set = PointSet::from_rows(vec![vec![5.0], vec![0.0], vec![1.0]]).unwrap();
        let mut arm = MedoidArm::new(0, &set, Metric::Euclidean, 3);
        arm.pull(1);
        arm.pull(1);
        assert_eq!(arm.pull(1), 0);
        assert_abs_diff_eq!(arm.stats().estimate(), 4.5, epsilon = 1e-12);
    }
}
