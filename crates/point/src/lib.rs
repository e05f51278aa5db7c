//! Points with partial-dimension distance sampling.
//!
//! Adaptive search never computes a full distance on the hot path. Instead it
//! asks a [`Point`] for the contribution of a handful of dimensions at a time
//! and averages those. Every [`Metric`] here is *dimension-additive*:
//!
//! ```text
//! distance(a, b) = finish( Σⱼ contribution(aⱼ, bⱼ) )
//! ```
//!
//! so the mean of sampled contributions is an unbiased estimate of
//! `Σⱼ contribution / dim`, and ranking by it preserves the ranking by the
//! finished distance.
//!
//! # Quick start
//!
//! ```
//! use banditnn_point::{DensePoint, Metric, Point, PointSet};
//!
//! let set = PointSet::new(vec![
//!     DensePoint::new(vec![0.0, 0.0]),
//!     DensePoint::new(vec![3.0, 4.0]),
//! ])
//! .unwrap();
//!
//! let a = &set[0];
//! let b = &set[1];
//! assert_eq!(a.distance(b, Metric::Euclidean), 5.0);
//! assert_eq!(a.partial_distance(b, &[1], Metric::SquaredEuclidean), 16.0);
//! ```

pub mod dense;
pub mod error;
pub mod metric;
pub mod set;
pub mod sparse;

pub use dense::DensePoint;
pub use error::PointError;
pub use metric::Metric;
pub use set::PointSet;
pub use sparse::SparsePoint;

/// A fixed-dimension vector that supports partial-dimension distance sampling.
///
/// Implementors are immutable after construction and shared across worker
/// threads, hence the `Send + Sync` bound.
pub trait Point: Send + Sync {
    /// Number of dimensions.
    fn dim(&self) -> usize;

    /// Value of dimension `j`. Sparse points return 0.0 for absent entries.
    ///
    /// # Panics
    ///
    /// May panic if `j >= self.dim()`.
    fn value(&self, j: usize) -> f64;

    /// Number of stored non-zero dimensions.
    fn nnz(&self) -> usize;

    /// Fraction of non-zero dimensions, used for sampling-cost modelling.
    fn sparsity(&self) -> f64 {
        if self.dim() == 0 {
            return 0.0;
        }
        self.nnz() as f64 / self.dim() as f64
    }

    /// Sum of per-dimension contributions over `dims` only.
    fn partial_distance(&self, other: &Self, dims: &[usize], metric: Metric) -> f64 {
        dims.iter()
            .map(|&j| metric.contribution(self.value(j), other.value(j)))
            .sum()
    }

    /// Sum of per-dimension contributions over every dimension.
    fn contribution_sum(&self, other: &Self, metric: Metric) -> f64;

    /// Full distance under `metric`.
    fn distance(&self, other: &Self, metric: Metric) -> f64 {
        metric.finish(self.contribution_sum(other, metric))
    }

    /// `true` when every stored value is finite.
    fn is_finite(&self) -> bool;
}
