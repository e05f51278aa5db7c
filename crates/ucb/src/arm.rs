//! Arm abstraction: a candidate whose mean reward is estimated by sampling.

use std::collections::HashMap;

use banditnn_stats::RunningStats;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bound::confidence_radius;

/// A candidate under evaluation by the engine.
///
/// An arm owns its sampling state and RNG, so pulling one arm never touches
/// another. That is what lets the engine pull arms on different threads.
pub trait Arm: Send {
    /// Candidate index this arm stands for.
    fn id(&self) -> usize;

    /// Number of distinct elementary samples (dimensions or points).
    fn population(&self) -> usize;

    /// Draws up to `sample_size` fresh elementary samples and records their
    /// mean as one pull. Returns the number drawn; 0 once exhausted, in which
    /// case no pull is recorded.
    fn pull(&mut self, sample_size: usize) -> usize;

    /// Running statistics.
    fn stats(&self) -> &ArmStats;

    /// Mutable running statistics, for bound updates.
    fn stats_mut(&mut self) -> &mut ArmStats;

    /// Exact mean over the whole population. Verification only: O(population).
    fn true_mean(&self) -> f64;

    /// `true` once every elementary sample has been drawn.
    fn is_exhausted(&self) -> bool {
        self.stats().drawn() >= self.population()
    }

    /// Maximum number of pulls this arm can make at `sample_size`.
    fn max_pulls(&self, sample_size: usize) -> usize {
        self.population().div_ceil(sample_size.max(1))
    }

    /// Recomputes the confidence interval.
    fn update_bound(&mut self, sigma: f64, delta: f64, n_arms: usize, sample_size: usize) {
        let exhausted = self.is_exhausted();
        let max_pulls = self.max_pulls(sample_size);
        self.stats_mut()
            .update_bound(sigma, delta, n_arms, max_pulls, exhausted);
    }
}

/// Running statistics of one arm.
///
/// The estimate is `sum / drawn` (exact once exhausted, even when the last
/// pull drew fewer than `sample_size` elements). Variance is tracked over
/// per-pull means, since that is the quantity the bound is about.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmStats {
    pulls: u64,
    drawn: usize,
    sum: f64,
    per_pull: RunningStats,
    lcb: f64,
    ucb: f64,
}

impl Default for ArmStats {
    fn default() -> Self {
        Self {
            pulls: 0,
            drawn: 0,
            sum: 0.0,
            per_pull: RunningStats::new(),
            lcb: f64::NEG_INFINITY,
            ucb: f64::INFINITY,
        }
    }
}

impl ArmStats {
    /// Records one pull that drew `count` elements summing to `sum`.
    pub fn record(&mut self, sum: f64, count: usize) {
        debug_assert!(count > 0);
        self.pulls += 1;
        self.drawn += count;
        self.sum += sum;
        self.per_pull.push(sum / count as f64);
    }

    /// Number of pulls (`numberOfPulls`).
    pub fn pulls(&self) -> u64 {
        self.pulls
    }

    /// Number of elementary samples drawn so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// Sum of every elementary sample (`sumOfSamples`).
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Current mean estimate (`estimateOfMean`). 0.0 before the first pull.
    pub fn estimate(&self) -> f64 {
        if self.drawn == 0 {
            return 0.0;
        }
        self.sum / self.drawn as f64
    }

    /// Sum of squared deviations of per-pull means.
    pub fn m2(&self) -> f64 {
        self.per_pull.m2()
    }

    /// Lower confidence bound.
    pub fn lcb(&self) -> f64 {
        self.lcb
    }

    /// Upper confidence bound.
    pub fn ucb(&self) -> f64 {
        self.ucb
    }

    /// Recomputes `[lcb, ucb]` around the estimate.
    ///
    /// Both bounds equal the estimate once `exhausted`.
    pub fn update_bound(
        &mut self,
        sigma: f64,
        delta: f64,
        n_arms: usize,
        max_pulls: usize,
        exhausted: bool,
    ) {
        if self.pulls == 0 {
            self.lcb = f64::NEG_INFINITY;
            self.ucb = f64::INFINITY;
            return;
        }
        let mean = self.estimate();
        let radius = if exhausted {
            0.0
        } else {
            confidence_radius(sigma, self.pulls, max_pulls as u64, n_arms, delta)
        };
        self.lcb = mean - radius;
        self.ucb = mean + radius;
    }
}

/// Draws indices from `0..population` without replacement, in batches.
///
/// A virtual Fisher-Yates shuffle: only swapped positions are stored, so
/// memory is proportional to the samples drawn, not to the population.
#[derive(Debug, Clone)]
pub(crate) struct Draws {
    population: usize,
    cursor: usize,
    swapped: HashMap<usize, usize>,
    rng: StdRng,
    batch: Vec<usize>,
}

impl Draws {
    pub(crate) fn new(population: usize, seed: u64) -> Self {
        Self {
            population,
            cursor: 0,
            swapped: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
            batch: Vec::new(),
        }
    }

    /// Next batch of at most `n` unseen indices. Empty once exhausted.
    pub(crate) fn next_batch(&mut self, n: usize) -> &[usize] {
        self.batch.clear();
        let end = (self.cursor + n).min(self.population);
        for i in self.cursor..end {
            let j = self.rng.random_range(i..self.population);
            let at_j = self.swapped.get(&j).copied().unwrap_or(j);
            let at_i = self.swapped.remove(&i).unwrap_or(i);
            if j != i {
                self.swapped.insert(j, at_i);
            }
            self.batch.push(at_j);
        }
        self.cursor = end;
        &self.batch
    }
}

/// Mixes a base seed with a stream index (SplitMix64 finaliser).
///
/// Used to give every query and every arm an independent, order-free RNG.
pub fn derive_seed(base: u64, stream: u64) -> u64 {
    let mut z = base ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
