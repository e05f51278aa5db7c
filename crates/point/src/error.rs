//! Error types for the banditnn-point crate.

/// Error type for point construction and point-set validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PointError {
    /// Returned when a point set has no points.
    #[error("point set is empty")]
    EmptySet,

    /// Returned when points have zero dimensions.
    #[error("points must have at least one dimension")]
    ZeroDimension,

    /// Returned when a point's dimension differs from the first point's.
    #[error("point {index} has dimension {got}, expected {expected}")]
    DimensionMismatch {
        /// Position of the offending point.
        index: usize,
        /// Dimension of the first point.
        expected: usize,
        /// Dimension of the offending point.
        got: usize,
    },

    /// Returned when a point contains NaN or infinity.
    #[error("point {index} contains a non-finite value")]
    NonFinite {
        /// Position of the offending point.
        index: usize,
    },

    /// Returned when a sparse entry lies outside the declared dimension.
    #[error("sparse index {index} out of range for dimension {dim}")]
    IndexOutOfRange {
        /// The offending coordinate index.
        index: usize,
        /// Declared dimension.
        dim: usize,
    },

    /// Returned when a sparse point lists the same coordinate twice.
    #[error("sparse index {index} appears more than once")]
    DuplicateIndex {
        /// The repeated coordinate index.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_set() {
        assert_eq!(PointError::EmptySet.to_string(), "point set is empty");
    }

    #[test]
    fn error_dimension_mismatch() {
        let e = PointError::DimensionMismatch {
            index: 3,
            expected: 10,
            got: 9,
        };
        assert_eq!(e.to_string(), "point 3 has dimension 9, expected 10");
    }

    #[test]
    fn error_non_finite() {
        let e = PointError::NonFinite { index: 7 };
        assert_eq!(e.to_string(), "point 7 contains a non-finite value");
    }

    #[test]
    fn error_index_out_of_range() {
        let e = PointError::IndexOutOfRange { index: 12, dim: 10 };
        assert_eq!(e.to_string(), "sparse index 12 out of range for dimension 10");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<PointError>();
    }
}
