use banditnn_point::{DensePoint, Metric, PointSet};
use banditnn_stats::argsort;
use banditnn_ucb::{
    Arm, CancelToken, KnnArm, MedoidArm, PullBudget, RunStatus, UcbConfig, UcbEngine, UcbError,
    derive_seed,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn random_set(n: usize, dim: usize, seed: u64) -> PointSet<DensePoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = (0..n)
        .map(|_| (0..dim).map(|_| rng.random_range(-10.0..10.0)).collect())
        .collect();
    PointSet::from_rows(rows).unwrap()
}

fn knn_arms<'a>(
    set: &'a PointSet<DensePoint>,
    query: usize,
    seed: u64,
) -> Vec<KnnArm<'a, DensePoint>> {
    (0..set.len())
        .filter(|&id| id != query)
        .map(|id| {
            KnnArm::new(
                id,
                &set[query],
                &set[id],
                Metric::SquaredEuclidean,
                derive_seed(seed, id as u64),
            )
        })
        .collect()
}

#[test]
fn full_sampling_matches_brute_force() {
    let set = random_set(30, 16, 1);
    let arms = knn_arms(&set, 0, 5);
    let truth: Vec<f64> = arms.iter().map(|a| a.true_mean()).collect();
    let ids: Vec<usize> = arms.iter().map(|a| a.id()).collect();
    let expected: Vec<usize> = argsort(&truth).into_iter().take(3).map(|i| ids[i]).collect();

    // one pull draws every dimension
    let engine = UcbEngine::new(UcbConfig::new(3).with_initial_pulls(1).with_sample_size(16)).unwrap();
    let state = engine.solve(arms, &CancelToken::new()).unwrap();
    let outcome = state.outcome();

    assert_eq!(outcome.status(), RunStatus::Confirmed);
    assert_eq!(outcome.top_ids(3), expected);
    assert_eq!(outcome.global_pulls(), 29);
}

#[test]
fn budget_never_exceeded() {
    for seed in 0..5 {
        let set = random_set(40, 64, seed);
        let arms = knn_arms(&set, 3, seed);
        let engine = UcbEngine::new(
            UcbConfig::new(5)
                .with_initial_pulls(2)
                .with_sample_size(2)
                .with_budget(PullBudget::Total(100))
                .with_extraction_pulls(10),
        )
        .unwrap();
        let state = engine.solve(arms, &CancelToken::new()).unwrap();
        assert!(
            state.global_pulls() <= 100,
            "seed {seed}: {} pulls",
            state.global_pulls()
        );
        let per_arm: u64 = state.arms().iter().map(|a| a.stats().pulls()).sum();
        assert_eq!(per_arm, state.global_pulls());
    }
}

#[test]
fn candidate_order_does_not_change_result() {
    let set = random_set(25, 32, 9);
    let config = UcbConfig::new(4).with_initial_pulls(3).with_sample_size(4);
    let engine = UcbEngine::new(config).unwrap();

    let forward = engine
        .solve(knn_arms(&set, 0, 11), &CancelToken::new())
        .unwrap()
        .outcome();

    let mut shuffled = knn_arms(&set, 0, 11);
    shuffled.shuffle(&mut StdRng::seed_from_u64(123));
    let backward = engine.solve(shuffled, &CancelToken::new()).unwrap().outcome();

    assert_eq!(forward.ranking(), backward.ranking());
    assert_eq!(forward.global_pulls(), backward.global_pulls());
    assert_eq!(forward.status(), backward.status());
}

#[test]
fn duplicate_candidates_tie_by_id() {
    let set = PointSet::from_rows(vec![
        vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0],
        vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0],
        vec![8.0, 8.0, 8.0, 8.0, 8.0, 8.0],
        vec![9.0, 9.0, 9.0, 9.0, 9.0, 9.0],
    ])
    .unwrap();
    let engine = UcbEngine::new(UcbConfig::new(1).with_initial_pulls(1).with_sample_size(2)).unwrap();
    let state = engine.solve(knn_arms(&set, 0, 3), &CancelToken::new()).unwrap();
    let outcome = state.outcome();
    assert_eq!(outcome.status(), RunStatus::Confirmed);
    assert_eq!(outcome.top_ids(2), vec![1, 2]);
}

#[test]
fn identical_points_have_zero_variance() {
    let set = PointSet::from_rows(vec![vec![2.0; 8]; 4]).unwrap();
    let engine = UcbEngine::new(UcbConfig::new(2).with_initial_pulls(2).with_sample_size(2)).unwrap();
    let state = engine.solve(knn_arms(&set, 0, 0), &CancelToken::new()).unwrap();
    let outcome = state.outcome();
    assert_eq!(outcome.status(), RunStatus::Confirmed);
    assert_eq!(outcome.sigma(), 0.0);
    assert!(outcome.arms().iter().all(|a| a.estimate == 0.0));
    assert_eq!(outcome.top_ids(2), vec![1, 2]);
}

#[test]
fn uniform_early_samples_never_confirm_a_wrong_answer() {
    // Candidate 1 is zero everywhere except one spike, so its first pulls
    // look closer than candidate 2 while its true mean ties candidate 3.
    let mut spike = vec![0.0; 100];
    spike[0] = 10.0;
    let set = PointSet::from_rows(vec![vec![0.0; 100], spike, vec![0.5; 100], vec![1.0; 100]])
        .unwrap();
    let engine = UcbEngine::new(
        UcbConfig::new(1)
            .with_initial_pulls(2)
            .with_sample_size(1)
            .with_delta(0.01),
    )
    .unwrap();
    for seed in 0..50 {
        let state = engine.solve(knn_arms(&set, 0, seed), &CancelToken::new()).unwrap();
        let outcome = state.outcome();
        assert_eq!(outcome.status(), RunStatus::Confirmed, "seed {seed}");
        assert_eq!(outcome.top_ids(1), vec![2], "seed {seed}");
    }
}

#[test]
fn medoid_full_sampling_finds_center() {
    let set = PointSet::from_rows(vec![
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![-1.0, 0.0],
        vec![0.0, -1.0],
        vec![7.0, 7.0],
    ])
    .unwrap();
    let arms: Vec<_> = (0..set.len())
        .map(|id| MedoidArm::new(id, &set, Metric::Euclidean, derive_seed(1, id as u64)))
        .collect();
    let engine = UcbEngine::new(UcbConfig::new(1).with_initial_pulls(1).with_sample_size(5)).unwrap();
    let state = engine.solve(arms, &CancelToken::new()).unwrap();
    assert_eq!(state.outcome().top_ids(1), vec![0]);
}

#[test]
fn cancelled_run_keeps_partial_ranking() {
    let set = random_set(20, 100, 4);
    let engine = UcbEngine::new(UcbConfig::new(2).with_initial_pulls(2).with_sample_size(1)).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let state = engine.solve(knn_arms(&set, 0, 2), &cancel).unwrap();
    let outcome = state.outcome();
    assert_eq!(outcome.status(), RunStatus::Cancelled);
    assert_eq!(outcome.global_pulls(), 19 * 2);
    assert_eq!(outcome.ranking().len(), 19);
}

#[test]
fn configuration_errors_fail_before_sampling() {
    let set = random_set(5, 4, 0);
    let engine = UcbEngine::new(UcbConfig::new(4).with_initial_pulls(1).with_sample_size(1)).unwrap();
    assert_eq!(
        engine.start(knn_arms(&set, 0, 0)).unwrap_err(),
        UcbError::InvalidK { k: 4, n_arms: 4 }
    );

    let engine = UcbEngine::new(UcbConfig::new(1).with_initial_pulls(5).with_sample_size(1)).unwrap();
    assert_eq!(
        engine.start(knn_arms(&set, 0, 0)).unwrap_err(),
        UcbError::InvalidInitialPulls { initial: 5, max: 4 }
    );

    assert_eq!(
        UcbEngine::new(UcbConfig::new(1).with_delta(1.0)).unwrap_err(),
        UcbError::InvalidDelta { delta: 1.0 }
    );
}
