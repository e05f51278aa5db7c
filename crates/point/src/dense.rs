//! Dense point representation.

use crate::Point;
use crate::metric::{Metric, dense_contribution_sum};

/// A point stored as a contiguous `Vec<f64>`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensePoint {
    values: Vec<f64>,
}

impl DensePoint {
    /// Wraps a vector of coordinates.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Returns the coordinates.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for DensePoint {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl Point for DensePoint {
    fn dim(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn value(&self, j: usize) -> f64 {
        self.values[j]
    }

    fn nnz(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    fn partial_distance(&self, other: &Self, dims: &[usize], metric: Metric) -> f64 {
        let (a, b) = (&self.values, &other.values);
        dims.iter()
            .map(|&j| metric.contribution(a[j], b[j]))
            .sum()
    }

    fn contribution_sum(&self, other: &Self, metric: Metric) -> f64 {
        dense_contribution_sum(&self.values, &other.values, metric)
    }

    fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_partial_over_all_dims_is_full() {
        let a = DensePoint::new(vec![1.0, 2.0, 3.0]);
        let b = DensePoint::new(vec![4.0, 6.0, 3.0]);
        let dims = [0, 1, 2];
        assert_abs_diff_eq!(
            a.partial_distance(&b, &dims, Metric::SquaredEuclidean),
            a.contribution_sum(&b, Metric::SquaredEuclidean)
        );
        assert_abs_diff_eq!(a.distance(&b, Metric::Euclidean), 5.0);
        assert_abs_diff_eq!(a.distance(&b, Metric::Manhattan), 7.0);
    }

    #[test]
    fn test_partial_subset() {
        let a = DensePoint::new(vec![0.0, 0.0, 0.0]);
        let b = DensePoint::new(vec![1.0, 2.0, 3.0]);
        assert_abs_diff_eq!(a.partial_distance(&b, &[2], Metric::SquaredEuclidean), 9.0);
        assert_abs_diff_eq!(a.partial_distance(&b, &[0, 2], Metric::Manhattan), 4.0);
        assert_abs_diff_eq!(a.partial_distance(&b, &[], Metric::Manhattan), 0.0);
    }

    #[test]
    fn test_sparsity() {
        let p = DensePoint::new(vec![0.0, 1.0, 0.0, 2.0]);
        assert_eq!(p.nnz(), 2);
        assert_abs_diff_eq!(p.sparsity(), 0.5);
    }

    #[test]
    fn test_is_finite() {
        assert!(DensePoint::new(vec![1.0, 2.0]).is_finite());
        assert!(!DensePoint::new(vec![1.0, f64::NAN]).is_finite());
        assert!(!DensePoint::new(vec![f64::INFINITY]).is_finite());
    }
}
