//! Adaptive k-nearest-neighbour and medoid search.
//!
//! Both searches turn a top-k problem over distances into a bandit problem:
//! each candidate becomes an arm, and the confidence-bound engine from
//! `banditnn-ucb` decides which distances are worth refining.
//!
//! | Search | Arm per | Samples per pull |
//! |--------|---------|------------------|
//! | [`KnnSearch`] | candidate (per query) | dimensions |
//! | [`MedoidSearch`] | point | other points |
//!
//! # Quick start
//!
//! ```
//! use banditnn_point::PointSet;
//! use banditnn_search::{Candidates, KnnSearch, SearchConfig};
//! use banditnn_ucb::{CancelToken, UcbConfig};
//!
//! let points = PointSet::from_rows(vec![
//!     vec![0.0, 0.0],
//!     vec![1.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![5.0, 5.0],
//!     vec![6.0, 6.0],
//! ])
//! .unwrap();
//! let config = SearchConfig::new(UcbConfig::new(2).with_initial_pulls(1).with_sample_size(2));
//! let search = KnnSearch::new(&points, Candidates::SameSet, config).unwrap();
//!
//! let report = search.query(0, &CancelToken::new()).unwrap();
//! let mut nearest = report.summary.answer.clone();
//! nearest.sort_unstable();
//! assert_eq!(nearest, vec![1, 2]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! KnnSearch::query() / MedoidSearch::run()
//!   ├─ build arms                 (banditnn-ucb: KnnArm / MedoidArm)
//!   ├─ start → initialise → run → extract, each timed
//!   ├─ window true means          (verify.rs)
//!   └─ optional brute force       (verify.rs)
//! ```

pub mod config;
pub mod error;
pub mod knn;
pub mod medoid;
pub mod report;
pub mod verify;

pub use config::SearchConfig;
pub use error::{ErrorClass, SearchError};
pub use knn::{Candidates, KnnSearch};
pub use medoid::MedoidSearch;
pub use report::{MedoidReport, QueryReport, RunParams, RunSummary, WindowEntry};
pub use verify::{Verification, brute_force, local_true_order, window_true_means};
