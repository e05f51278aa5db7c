//! Validated, immutable collections of points.

use std::ops::Index;

use crate::Point;
use crate::dense::DensePoint;
use crate::error::PointError;

/// A non-empty, positionally indexed collection of points of equal dimension.
///
/// Validation happens once at construction; every consumer downstream may
/// assume uniform dimension and finite values.
#[derive(Debug, Clone)]
pub struct PointSet<P> {
    points: Vec<P>,
    dim: usize,
}

impl<P: Point> PointSet<P> {
    /// Validates and wraps `points`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`PointError::EmptySet`] | `points` is empty |
    /// | [`PointError::ZeroDimension`] | first point has no dimensions |
    /// | [`PointError::DimensionMismatch`] | any point differs from the first |
    /// | [`PointError::NonFinite`] | any point has NaN or infinity |
    pub fn new(points: Vec<P>) -> Result<Self, PointError> {
        let first = points.first().ok_or(PointError::EmptySet)?;
        let dim = first.dim();
        if dim == 0 {
            return Err(PointError::ZeroDimension);
        }
        for (index, p) in points.iter().enumerate() {
            if p.dim() != dim {
                return Err(PointError::DimensionMismatch {
                    index,
                    expected: dim,
                    got: p.dim(),
                });
            }
            if !p.is_finite() {
                return Err(PointError::NonFinite { index });
            }
        }
        Ok(Self { points, dim })
    }

    /// Number of points. Always at least 1.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shared dimension of every point.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the point at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&P> {
        self.points.get(index)
    }

    /// Returns all points as a slice.
    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Iterates over the points in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.points.iter()
    }

    /// Mean fraction of non-zero dimensions across the set.
    pub fn mean_sparsity(&self) -> f64 {
        self.points.iter().map(Point::sparsity).sum::<f64>() / self.points.len() as f64
    }
}

impl PointSet<DensePoint> {
    /// Convenience constructor from row vectors.
    ///
    /// # Errors
    ///
    /// Same as [`PointSet::new`].
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, PointError> {
        Self::new(rows.into_iter().map(DensePoint::new).collect())
    }
}

impl<P> Index<usize> for PointSet<P> {
    type Output = P;

    fn index(&self, index: usize) -> &P {
        &self.points[index]
    }
}

impl<'a, P> IntoIterator for &'a PointSet<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
