//! Sparse point representation.

use std::cmp::Ordering;

use crate::Point;
use crate::error::PointError;
use crate::metric::Metric;

/// A point that stores only its non-zero coordinates.
///
/// Entries are kept sorted by coordinate index. Explicit zeros are dropped at
/// construction so [`Point::nnz`] is exact.
#[derive(Debug, Clone, PartialEq)]
pub struct SparsePoint {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparsePoint {
    /// Builds a sparse point from `(index, value)` entries in any order.
    ///
    /// # Errors
    ///
    /// Returns [`PointError::IndexOutOfRange`] if an index is `>= dim`, and
    /// [`PointError::DuplicateIndex`] if an index repeats.
    pub fn new(dim: usize, mut entries: Vec<(usize, f64)>) -> Result<Self, PointError> {
        entries.sort_unstable_by_key(|&(j, _)| j);
        let mut indices = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        let mut previous = None;
        for (j, v) in entries {
            if j >= dim {
                return Err(PointError::IndexOutOfRange { index: j, dim });
            }
            if previous == Some(j) {
                return Err(PointError::DuplicateIndex { index: j });
            }
            previous = Some(j);
            if v != 0.0 {
                indices.push(j);
                values.push(v);
            }
        }
        Ok(Self {
            dim,
            indices,
            values,
        })
    }

    /// Stored coordinate indices, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stored values, aligned with [`SparsePoint::indices`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Point for SparsePoint {
    fn dim(&self) -> usize {
        self.dim
    }

    fn value(&self, j: usize) -> f64 {
        debug_assert!(j < self.dim);
        match self.indices.binary_search(&j) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Merge-join over the non-zeros of both points: O(nnz(a) + nnz(b)).
    fn contribution_sum(&self, other: &Self, metric: Metric) -> f64 {
        let (ia, va) = (&self.indices, &self.values);
        let (ib, vb) = (&other.indices, &other.values);
        let (mut p, mut q) = (0, 0);
        let mut acc = 0.0;
        while p < ia.len() && q < ib.len() {
            match ia[p].cmp(&ib[q]) {
                Ordering::Less => {
                    acc += metric.contribution(va[p], 0.0);
                    p += 1;
                }
                Ordering::Greater => {
                    acc += metric.contribution(0.0, vb[q]);
                    q += 1;
                }
                Ordering::Equal => {
                    acc += metric.contribution(va[p], vb[q]);
                    p += 1;
                    q += 1;
                }
            }
        }
        acc += va[p..].iter().map(|&v| metric.contribution(v, 0.0)).sum::<f64>();
        acc += vb[q..].iter().map(|&v| metric.contribution(0.0, v)).sum::<f64>();
        acc
    }

    fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
