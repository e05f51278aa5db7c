//! Dimension-additive distance metrics.

/// Distance metric used to compare points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    /// `Σ (aⱼ − bⱼ)²`.
    #[default]
    SquaredEuclidean,
    /// `sqrt(Σ (aⱼ − bⱼ)²)`. Samples squared differences; the square root is
    /// applied only to full distances.
    Euclidean,
    /// `Σ |aⱼ − bⱼ|`.
    Manhattan,
}

impl Metric {
    /// Contribution of a single dimension.
    #[inline]
    pub fn contribution(self, a: f64, b: f64) -> f64 {
        let d = a - b;
        match self {
            Metric::SquaredEuclidean | Metric::Euclidean => d * d,
            Metric::Manhattan => d.abs(),
        }
    }

    /// Maps a full contribution sum to the distance.
    #[inline]
    pub fn finish(self, sum: f64) -> f64 {
        match self {
            Metric::Euclidean => sum.sqrt(),
            Metric::SquaredEuclidean | Metric::Manhattan => sum,
        }
    }

    /// Stable lower-case name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Metric::SquaredEuclidean => "squared-euclidean",
            Metric::Euclidean => "euclidean",
            Metric::Manhattan => "manhattan",
        }
    }
}

/// Contribution sum between two dense rows of equal length.
///
/// Specialised loops per metric keep the inner body branch-free.
///
/// # Panics
///
/// Debug-asserts that `a.len() == b.len()`.
pub(crate) fn dense_contribution_sum(a: &[f64], b: &[f64], metric: Metric) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    match metric {
        Metric::SquaredEuclidean | Metric::Euclidean => sq_diff_sum(a, b),
        Metric::Manhattan => abs_diff_sum(a, b),
    }
}

#[inline]
fn sq_diff_sum(a: &[f64], b: &[f64]) -> f64 {
    let mut acc = 0.0;
    for (x, y) in a.iter().zip(b) {
        let d = x - y;
        acc += d * d;
    }
    acc
}

#[inline]
fn abs_diff_sum(a: &[f64], b: &[f64]) -> f64 {
    let mut acc = 0.0;
    for (x, y) in a.iter().zip(b) {
        acc += (x - y).abs();
    }
    acc
}
