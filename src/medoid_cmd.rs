//! Medoid command: adaptive medoid search over a point file.

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use banditnn_io::write_medoid_report;
use banditnn_point::{Point, PointSet};
use banditnn_search::{MedoidReport, MedoidSearch, SearchConfig};
use banditnn_ucb::CancelToken;

use crate::cli::MedoidArgs;
use crate::config::BanditnnConfig;
use crate::convert;
use crate::input::{self, Points};

/// Run the medoid pipeline.
pub fn run(args: MedoidArgs) -> Result<()> {
    let _cmd = info_span!("medoid").entered();

    let config = BanditnnConfig::from_args(&args.common)?;
    let search_cfg = convert::build_medoid_config(&config.bandit, &config.medoid, config.seed)?;

    let points = input::load(&config.input)?;
    let report = match points {
        Points::Dense(ref set) => search(set, search_cfg)?,
        Points::Sparse(ref set) => search(set, search_cfg)?,
    };

    let summary = &report.summary;
    if summary.verdict() == Some(false) {
        warn!("medoid differs from brute force");
    }
    let path = write_medoid_report(&config.output.dir, &report)
        .context("failed to write medoid report")?;
    info!(
        answer = ?summary.answer,
        status = %summary.status,
        global_pulls = summary.global_pulls,
        distance_evaluations = report.distance_evaluations,
        path = %path.display(),
        "medoid report written"
    );
    Ok(())
}

fn search<P: Point>(points: &PointSet<P>, config: SearchConfig) -> Result<MedoidReport> {
    let search = MedoidSearch::new(points, config).context("invalid medoid configuration")?;
    search
        .run(&CancelToken::new())
        .context("medoid search failed")
}
