use approx::assert_abs_diff_eq;
use banditnn_point::{DensePoint, Metric, Point, PointSet};
use banditnn_search::{ErrorClass, MedoidSearch, SearchConfig, SearchError};
use banditnn_ucb::{CancelToken, PullBudget, RunStatus, UcbConfig, UcbError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Nine points around the origin plus one far outlier.
fn cluster_with_outlier(seed: u64) -> PointSet<DensePoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.1).unwrap();
    let mut rows: Vec<Vec<f64>> = (0..9)
        .map(|_| vec![noise.sample(&mut rng), noise.sample(&mut rng)])
        .collect();
    rows.push(vec![50.0, 50.0]);
    PointSet::from_rows(rows).unwrap()
}

fn brute_medoid(points: &PointSet<DensePoint>, metric: Metric) -> usize {
    let n = points.len();
    let avg: Vec<f64> = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| j != i)
                .map(|j| points[i].distance(&points[j], metric))
                .sum::<f64>()
                / (n - 1) as f64
        })
        .collect();
    banditnn_stats::argsort(&avg)[0]
}

#[test]
fn clustered_medoid_matches_brute_force() {
    for seed in 0..3 {
        let points = cluster_with_outlier(seed);
        let expected = brute_medoid(&points, Metric::Euclidean);
        let config = SearchConfig::new(UcbConfig::new(1).with_initial_pulls(2).with_sample_size(3))
            .with_seed(seed)
            .with_verify(true);
        let report = MedoidSearch::new(&points, config)
            .unwrap()
            .run(&CancelToken::new())
            .unwrap();

        assert_eq!(report.summary.answer, vec![expected], "seed {seed}");
        assert_eq!(report.summary.verdict(), Some(true));
        assert_ne!(report.summary.answer[0], 9, "outlier is never the medoid");
    }
}

#[test]
fn report_diagnostics_are_consistent() {
    let points = cluster_with_outlier(11);
    let config = SearchConfig::new(
        UcbConfig::new(1)
            .with_initial_pulls(2)
            .with_sample_size(3)
            .with_margin_factor(2),
    );
    let report = MedoidSearch::new(&points, config)
        .unwrap()
        .run(&CancelToken::new())
        .unwrap();
    let summary = &report.summary;

    assert_eq!(summary.window.len(), 3);
    assert_eq!(summary.position.len(), 3);
    assert_eq!(summary.params.n, 10);
    assert_eq!(summary.params.d, 2);
    assert!(summary.pulls_by_candidate.iter().all(Option::is_some));
    assert_abs_diff_eq!(
        summary.average_pulls,
        summary.global_pulls as f64 / 10.0,
        epsilon = 1e-12
    );
    // dense points with no zero coordinates: sparsity 1
    assert_abs_diff_eq!(
        report.distance_evaluations,
        summary.global_pulls as f64 * 3.0 / 10.0,
        epsilon = 1e-9
    );
    for entry in &summary.window {
        assert!(entry.lcb <= entry.estimate && entry.estimate <= entry.ucb);
    }
}

#[test]
fn budget_caps_medoid_run() {
    let points = cluster_with_outlier(5);
    let config = SearchConfig::new(
        UcbConfig::new(1)
            .with_initial_pulls(1)
            .with_sample_size(1)
            .with_budget(PullBudget::Total(10)),
    );
    let report = MedoidSearch::new(&points, config)
        .unwrap()
        .run(&CancelToken::new())
        .unwrap();
    // the initial phase spends the whole budget
    assert_eq!(report.summary.global_pulls, 10);
    assert_eq!(report.summary.rounds, 0);
    assert_eq!(report.summary.status, RunStatus::BudgetExhausted);
}

#[test]
fn k_must_be_below_point_count() {
    let points = PointSet::from_rows(vec![vec![0.0], vec![1.0]]).unwrap();
    let config = SearchConfig::new(UcbConfig::new(2).with_initial_pulls(1).with_sample_size(1));
    let err = MedoidSearch::new(&points, config)
        .unwrap()
        .run(&CancelToken::new())
        .unwrap_err();
    assert_eq!(err, SearchError::Ucb(UcbError::InvalidK { k: 2, n_arms: 2 }));
    assert_eq!(err.class(), ErrorClass::Config);
}
