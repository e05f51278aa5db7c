//! Confidence-bound top-k arm identification.
//!
//! Each candidate is an [`Arm`] whose mean reward (an average distance) is
//! estimated by sampling without replacement. The [`UcbEngine`] keeps a
//! confidence interval per arm and spends pulls only where the intervals of
//! the current top `k` and the rest still overlap.
//!
//! Two arm kinds are provided:
//!
//! - [`KnnArm`]: one candidate against a fixed query, sampling dimensions.
//! - [`MedoidArm`]: one candidate against the whole point set, sampling
//!   other points.
//!
//! # Example
//!
//! ```
//! use banditnn_point::{DensePoint, Metric, PointSet};
//! use banditnn_ucb::{CancelToken, KnnArm, RunStatus, UcbConfig, UcbEngine, derive_seed};
//!
//! let set = PointSet::from_rows(vec![
//!     vec![0.0, 0.0, 0.0, 0.0],
//!     vec![1.0, 1.0, 1.0, 1.0],
//!     vec![5.0, 5.0, 5.0, 5.0],
//!     vec![9.0, 9.0, 9.0, 9.0],
//! ])
//! .unwrap();
//! let query = &set[0];
//! let arms: Vec<_> = (1..set.len())
//!     .map(|id| KnnArm::new(id, query, &set[id], Metric::SquaredEuclidean, derive_seed(7, id as u64)))
//!     .collect();
//!
//! let config = UcbConfig::new(1).with_initial_pulls(2).with_sample_size(2);
//! let engine = UcbEngine::new(config).unwrap();
//! let state = engine.solve(arms, &CancelToken::new()).unwrap();
//! let outcome = state.outcome();
//!
//! assert_eq!(outcome.status(), RunStatus::Confirmed);
//! assert_eq!(outcome.top_ids(1), vec![1]);
//! ```

pub mod arm;
pub mod bound;
pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod knn_arm;
pub mod medoid_arm;
pub mod outcome;
pub mod timing;

pub use arm::{Arm, ArmStats, derive_seed};
pub use bound::confidence_radius;
pub use cancel::CancelToken;
pub use config::{PullBudget, UcbConfig};
pub use engine::{PARALLEL_PULL_MIN, RunState, UcbEngine};
pub use error::UcbError;
pub use knn_arm::KnnArm;
pub use medoid_arm::MedoidArm;
pub use outcome::{ArmStatus, ArmSummary, RunStatus, UcbOutcome};
pub use timing::{Phase, PhaseTimer};
