//! Confidence radius for sampling without replacement.
//!
//! Hoeffding-Serfling bound with a union bound over arms and pull counts:
//!
//! ```text
//! r(p) = σ · sqrt( 2 · ln(π² · n_arms · p² / (3δ)) · (1 − (p − 1)/P) / p )
//! ```
//!
//! where `p` is the number of pulls, `P` the maximum number of pulls the arm
//! can make, and `σ` the pooled per-pull standard deviation. Summing
//! `3δ / (π² n_arms p²)` over all arms and all `p ≥ 1` gives `δ / 2` per
//! side, so every interval holds simultaneously with probability `≥ 1 − δ`.
//! The finite-population factor drives the radius to `σ·sqrt(2·ln(..)/P²)`
//! at the last pull; exhausted arms skip the bound entirely.
//!
//! A pooled `σ` of zero only means every pull so far returned the same mean.
//! That says nothing about the unseen coordinates, so it yields an unbounded
//! interval rather than a point.

use std::f64::consts::PI;

/// Half-width of the confidence interval after `pulls` of at most `max_pulls`.
///
/// Returns 0.0 when `pulls == 0`, and infinity when `sigma` is not positive.
pub fn confidence_radius(sigma: f64, pulls: u64, max_pulls: u64, n_arms: usize, delta: f64) -> f64 {
    if pulls == 0 {
        return 0.0;
    }
    if sigma.is_nan() || sigma <= 0.0 {
        return f64::INFINITY;
    }
    let p = pulls as f64;
    let big_p = (max_pulls.max(pulls)) as f64;
    let log_term = (PI * PI * n_arms.max(1) as f64 * p * p / (3.0 * delta)).ln();
    let fpc = (1.0 - (p - 1.0) / big_p).max(0.0);
    sigma * (2.0 * log_term * fpc / p).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_sigma_is_unbounded() {
        assert_eq!(confidence_radius(0.0, 5, 100, 10, 0.1), f64::INFINITY);
        assert_eq!(confidence_radius(f64::NAN, 5, 100, 10, 0.1), f64::INFINITY);
        // the last pull still has no spread to go on
        assert_eq!(confidence_radius(0.0, 100, 100, 10, 0.1), f64::INFINITY);
    }

    #[test]
    fn test_zero_pulls() {
        assert_eq!(confidence_radius(1.0, 0, 100, 10, 0.1), 0.0);
    }

    #[test]
    fn test_hand_computed() {
        // p = 1, P = 1000: fpc = 1
        let expected = (2.0 * (PI * PI * 10.0 / (3.0 * 0.1)).ln()).sqrt();
        assert_abs_diff_eq!(
            confidence_radius(1.0, 1, 1000, 10, 0.1),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_shrinks_with_pulls() {
        let mut prev = f64::INFINITY;
        for p in [1, 2, 4, 16, 64, 256] {
            let r = confidence_radius(1.0, p, 10_000, 100, 0.01);
            assert!(r < prev, "radius should shrink: p={p}, r={r}, prev={prev}");
            prev = r;
        }
    }

    #[test]
    fn test_scales_with_sigma() {
        let r1 = confidence_radius(1.0, 10, 100, 50, 0.05);
        let r3 = confidence_radius(3.0, 10, 100, 50, 0.05);
        assert_abs_diff_eq!(r3, 3.0 * r1, epsilon = 1e-12);
    }

    #[test]
    fn test_smaller_delta_widens() {
        let loose = confidence_radius(1.0, 10, 100, 50, 0.5);
        let tight = confidence_radius(1.0, 10, 100, 50, 0.001);
        assert!(tight > loose);
    }

    #[test]
    fn test_finite_population_shrinks_near_end() {
        let mid = confidence_radius(1.0, 50, 100, 10, 0.1);
        let without_fpc = confidence_radius(1.0, 50, u64::MAX, 10, 0.1);
        assert!(mid < without_fpc);
    }
}
