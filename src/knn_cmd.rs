//! Knn command: adaptive nearest-neighbour search over a point file.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use banditnn_io::write_query_report;
use banditnn_point::{Point, PointSet};
use banditnn_search::{Candidates, KnnSearch, QueryReport, SearchConfig};
use banditnn_ucb::CancelToken;

use crate::cli::KnnArgs;
use crate::config::BanditnnConfig;
use crate::convert;
use crate::input::{self, Points};

/// Run the KNN pipeline.
pub fn run(args: KnnArgs) -> Result<()> {
    let _cmd = info_span!("knn").entered();

    // 1. Config file plus CLI overrides
    let config = BanditnnConfig::from_args(&args.common)?;
    let search_cfg = convert::build_knn_config(&config.bandit, &config.knn, config.seed)?;
    let queries = match args.queries {
        Some(ref list) => Some(convert::parse_query_list(list)?),
        None => config.knn.queries.clone(),
    };

    // 2. Read points; the query set doubles as the candidate set
    let points = input::load(&config.input)?;
    let reports = match points {
        Points::Dense(ref set) => search(set, search_cfg, queries.as_deref())?,
        Points::Sparse(ref set) => search(set, search_cfg, queries.as_deref())?,
    };

    // 3. Write reports sequentially, after the parallel section
    write_reports(&config.output.dir, &reports)
}

fn search<P: Point>(
    points: &PointSet<P>,
    config: SearchConfig,
    queries: Option<&[usize]>,
) -> Result<Vec<QueryReport>> {
    let search = KnnSearch::new(points, Candidates::SameSet, config)
        .context("invalid knn configuration")?;
    let cancel = CancelToken::new();
    let reports = match queries {
        Some(indices) => search.run(indices, &cancel),
        None => search.run_all(&cancel),
    }
    .context("knn search failed")?;
    Ok(reports)
}

fn write_reports(dir: &Path, reports: &[QueryReport]) -> Result<()> {
    let mut unconfirmed = 0usize;
    let mut mismatched = 0usize;
    for report in reports {
        let summary = &report.summary;
        if !summary.status.is_confirmed() {
            unconfirmed += 1;
        }
        if summary.verdict() == Some(false) {
            mismatched += 1;
            warn!(query = report.query, "answer differs from brute force");
        }
        write_query_report(dir, report)
            .with_context(|| format!("failed to write report for query {}", report.query))?;
    }
    let average_pulls = if reports.is_empty() {
        0.0
    } else {
        reports.iter().map(|r| r.summary.average_pulls).sum::<f64>() / reports.len() as f64
    };
    if unconfirmed > 0 {
        warn!(unconfirmed, "some queries ended without a confirmed answer");
    }
    info!(
        queries = reports.len(),
        average_pulls,
        mismatched,
        dir = %dir.display(),
        "knn reports written"
    );
    Ok(())
}
